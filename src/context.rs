use anyhow::Context as _;

/// Knobs of the GPU backend and the default camera.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub clear_colour: wgpu::Color,
    /// vertical field of view in degrees
    pub fovy: f32,
    pub z_near: f32,
    /// format of the colour target the renderer draws into
    pub format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    /// request line polygon mode so wireframe draws are honoured
    pub wireframe: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_colour: wgpu::Color::BLACK,
            fovy: 80.0,
            z_near: 1.0,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            depth_format: None,
            wireframe: true,
        }
    }
}

/// Device, queue and settings shared by the GPU side of the crate.
#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub settings: RenderSettings,
    pub(crate) line_mode: bool,
}

impl GpuContext {
    /// Wraps a device created by the host (e.g. one that also drives a window surface).
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, settings: RenderSettings) -> Self {
        let line_mode = settings.wireframe
            && device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        Self {
            device,
            queue,
            settings,
            line_mode,
        }
    }

    /// Creates a device without a surface, for offscreen rendering and tests.
    pub async fn headless(settings: RenderSettings) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter found")?;
        log::info!("using adapter {}", adapter.get_info().name);

        let wants_lines = settings.wireframe;
        let has_lines = adapter.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        if wants_lines && !has_lines {
            log::warn!("adapter lacks line polygon mode, wireframe draws will be filled");
        }
        let required_features = if wants_lines && has_lines {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scene-ngin device"),
                required_features,
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("failed to create GPU device")?;

        Ok(Self::new(device, queue, settings))
    }

    /// Whether wireframe draws are rendered as lines on this device.
    pub fn supports_wireframe(&self) -> bool {
        self.line_mode
    }
}

/// Initializes logging for the current platform. Safe to call more than once.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
