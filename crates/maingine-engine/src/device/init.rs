/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// Defaults to `AutoNoVsync`: the loop engine paces frames itself, and a
    /// blocking vsync present would throttle ticks along with frames.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference, ignored if the surface lacks it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Power preference used when picking the adapter.
    pub power_preference: wgpu::PowerPreference,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Present with vsync, letting the display cap the frame rate.
    pub fn with_vsync(mut self) -> Self {
        self.present_mode = wgpu::PresentMode::AutoVsync;
        self
    }
}
