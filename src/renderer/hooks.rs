// renderer/hooks.rs
use crate::scene::CameraComponent;

pub type FrameHook = Box<dyn FnMut()>;
pub type CameraHook = Box<dyn FnMut(&CameraComponent)>;

/// Optional callbacks run around a frame and around each camera.
#[derive(Default)]
pub struct RenderHooks {
    pub pre_render: Option<FrameHook>,
    pub post_render: Option<FrameHook>,
    pub pre_camera: Option<CameraHook>,
    pub post_camera: Option<CameraHook>,
}

impl RenderHooks {
    pub(crate) fn run_pre_render(&mut self) {
        if let Some(hook) = self.pre_render.as_mut() {
            hook();
        }
    }

    pub(crate) fn run_post_render(&mut self) {
        if let Some(hook) = self.post_render.as_mut() {
            hook();
        }
    }

    pub(crate) fn run_pre_camera(&mut self, camera: &CameraComponent) {
        if let Some(hook) = self.pre_camera.as_mut() {
            hook(camera);
        }
    }

    pub(crate) fn run_post_camera(&mut self, camera: &CameraComponent) {
        if let Some(hook) = self.post_camera.as_mut() {
            hook(camera);
        }
    }
}
