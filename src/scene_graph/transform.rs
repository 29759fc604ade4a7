use std::ops::Mul;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::TransformError;

/// Forward matrix paired with its inverse.
///
/// Both halves are produced together and composed together, so
/// `matrix * inverse` stays at identity (within float tolerance) through any
/// chain of multiplications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixTransform {
    matrix: Mat4,
    inverse: Mat4,
}

impl MatrixTransform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
    };

    /// Builds a pair from a matrix whose inverse is already known.
    pub(crate) fn from_parts(matrix: Mat4, inverse: Mat4) -> Self {
        Self { matrix, inverse }
    }

    /// Builds a pair by numerically inverting `matrix`.
    pub fn from_matrix(matrix: Mat4) -> Result<Self, TransformError> {
        let determinant = matrix.determinant();
        if !determinant.is_finite() || determinant.abs() <= f32::EPSILON {
            return Err(TransformError::Degenerate);
        }

        Ok(Self {
            matrix,
            inverse: matrix.inverse(),
        })
    }

    /// Left-handed view transform looking from `eye` towards `target`.
    ///
    /// The viewer's forward axis is `+Z`, matching the depth convention of
    /// [`crate::camera::Camera::projection_matrix`].
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, TransformError> {
        let forward = target - eye;
        if forward.length_squared() <= f32::EPSILON
            || forward.cross(up).length_squared() <= f32::EPSILON
        {
            return Err(TransformError::Degenerate);
        }

        Self::from_matrix(Mat4::look_at_lh(eye, target, up))
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn inverse_matrix(&self) -> &Mat4 {
        &self.inverse
    }

    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.inverse,
            inverse: self.matrix,
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.matrix.transform_vector3(vector)
    }

    /// Where the local origin lands.
    pub fn origin(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.matrix.abs_diff_eq(other.matrix, max_abs_diff)
            && self.inverse.abs_diff_eq(other.inverse, max_abs_diff)
    }
}

impl Default for MatrixTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `parent * child` places `child` inside `parent`'s frame.
impl Mul for MatrixTransform {
    type Output = MatrixTransform;

    fn mul(self, rhs: MatrixTransform) -> MatrixTransform {
        MatrixTransform {
            matrix: self.matrix * rhs.matrix,
            inverse: rhs.inverse * self.inverse,
        }
    }
}

/// Derives a child's world transform from its parent's world transform and
/// its own local transform. Every hierarchical query goes through here.
pub fn compose(parent_world: &MatrixTransform, local: &MatrixTransform) -> MatrixTransform {
    *parent_world * *local
}

/// Position, rotation and scale of a node relative to its parent.
///
/// Rotation is stored in degrees and applied in X, Y, Z order. Scale
/// components are always finite and strictly positive; constructors and
/// setters reject anything else, so [`NodeTransform::matrix`] never has to
/// invert a singular matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    const ROTATION_ORDER: EulerRot = EulerRot::XYZ;

    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Result<Self, TransformError> {
        Self::check_finite(position)?;
        Self::check_finite(rotation)?;
        Self::check_scale(scale)?;

        Ok(Self {
            position,
            rotation,
            scale,
        })
    }

    pub fn from_position(position: Vec3) -> Result<Self, TransformError> {
        Self::new(position, Vec3::ZERO, Vec3::ONE)
    }

    pub fn from_rotation(rotation: Vec3) -> Result<Self, TransformError> {
        Self::new(Vec3::ZERO, rotation, Vec3::ONE)
    }

    /// Decomposes an affine matrix back into position, rotation and scale.
    pub fn from_matrix(transform: &MatrixTransform) -> Result<Self, TransformError> {
        let (scale, rotation, position) = transform.matrix().to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(Self::ROTATION_ORDER);
        let rotation = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());

        Self::new(position, rotation, scale)
    }

    fn check_finite(value: Vec3) -> Result<(), TransformError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(TransformError::NonFinite(value))
        }
    }

    fn check_scale(scale: Vec3) -> Result<(), TransformError> {
        Self::check_finite(scale)?;

        if scale.cmpgt(Vec3::ZERO).all() {
            Ok(())
        } else {
            Err(TransformError::NonPositiveScale(scale))
        }
    }

    fn quat(&self) -> Quat {
        let radians = self.rotation * (std::f32::consts::PI / 180.0);
        Quat::from_euler(Self::ROTATION_ORDER, radians.x, radians.y, radians.z)
    }

    /// Forward matrix `T * R * S` and its inverse `S⁻¹ * R⁻¹ * T⁻¹`.
    pub fn matrix(&self) -> MatrixTransform {
        let rotation = self.quat();

        let matrix = Mat4::from_scale_rotation_translation(self.scale, rotation, self.position);
        let inverse = Mat4::from_scale(self.scale.recip())
            * Mat4::from_quat(rotation.conjugate())
            * Mat4::from_translation(-self.position);

        MatrixTransform::from_parts(matrix, inverse)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), TransformError> {
        Self::check_finite(position)?;
        self.position = position;
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> Result<(), TransformError> {
        Self::check_finite(rotation)?;
        self.rotation = rotation;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) -> Result<(), TransformError> {
        Self::check_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn translate(&mut self, delta: Vec3) -> Result<(), TransformError> {
        self.set_position(self.position + delta)
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Result<Self, TransformError> {
        self.set_rotation(rotation)?;
        Ok(self)
    }

    pub fn with_scale(mut self, scale: Vec3) -> Result<Self, TransformError> {
        self.set_scale(scale)?;
        Ok(self)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
