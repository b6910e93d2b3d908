//! 组件系统模块
//!
//! 场景中的相机、模型变换与光源。

mod component;
mod transform;
mod camera;
mod light;

pub use component::Component;
pub use transform::{Transform, TransformOrder};
pub use camera::{Camera, CameraMovement, FAR_Z, NEAR_Z};
pub use light::{Attenuation, Light, PhongColors, PointLight, SpotLight};
