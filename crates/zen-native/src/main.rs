use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use glam::{EulerRot, Mat4, Vec2};
use rand::prelude::*;
use zen_core::{
    exp_ramp, fill_noise, BeatEvent, BeatScheduler, Camera, FrameInput, ParticleField,
    DEFAULT_PARTICLE_COUNT, ENVELOPE_FLOOR, KICK_DURATION_SEC, KICK_END_HZ, KICK_GAIN,
    KICK_START_HZ, NOISE_DURATION_SEC, NOISE_GAIN, POINTER_SMOOTHING, POINT_WORLD_SIZE,
    ROTATION_RATE_X, ROTATION_RATE_Y, SCENE_WGSL, TIME_STEP,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    misc: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos_size: [f32; 4],
    color: [f32; 4],
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,

    field: ParticleField,
    instances: Vec<InstanceData>,
    pointer_target: Vec2,
    pointer: Vec2,
    rotation: Vec2,
    elapsed_sec: f32,
    speed: f32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, field: ParticleField) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<InstanceData>() * field.count()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-particle instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 2,
                    },
                ],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let capacity = field.count();
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            bind_group,
            width: size.width,
            height: size.height,
            field,
            instances: Vec::with_capacity(capacity),
            pointer_target: Vec2::ZERO,
            pointer: Vec2::ZERO,
            rotation: Vec2::ZERO,
            elapsed_sec: 0.0,
            speed: 1.0,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn set_pointer_target(&mut self, target: Vec2) {
        self.pointer_target = target;
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Host-side per-frame stepping: pointer smoothing, field update,
        // whole-field rotation
        self.pointer += (self.pointer_target - self.pointer) * POINTER_SMOOTHING;
        self.elapsed_sec += TIME_STEP * self.speed;
        let input = FrameInput {
            elapsed_sec: self.elapsed_sec,
            speed: self.speed,
            pointer: self.pointer,
        };
        self.field.update(&input);
        self.rotation.y += ROTATION_RATE_Y * self.speed;
        self.rotation.x += ROTATION_RATE_X * self.speed;
        let model = Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);

        let camera = Camera::new(self.width as f32 / self.height.max(1) as f32);
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view: camera.view_matrix().to_cols_array_2d(),
                proj: camera.projection_matrix().to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                misc: [POINT_WORLD_SIZE, 0.0, 0.0, 0.0],
            }),
        );

        self.instances.clear();
        let positions = self.field.positions();
        let sizes = self.field.sizes();
        let colors = self.field.colors();
        for i in 0..self.field.count() {
            let i3 = i * 3;
            self.instances.push(InstanceData {
                pos_size: [positions[i3], positions[i3 + 1], positions[i3 + 2], sizes[i]],
                color: [colors[i3], colors[i3 + 1], colors[i3 + 2], 1.0],
            });
        }
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&self.instances));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..self.field.count() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42);
    let field = ParticleField::new(DEFAULT_PARTICLE_COUNT, seed);
    log::info!("[field] particles={}", field.count());

    // Beat audio: cpal stream + scheduler thread, toggled with Space
    let audio = start_audio_engine();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("zen-field (native)")
        .build(&event_loop)
        .expect("window");

    let mut state = pollster::block_on(GpuState::new(&window, field)).expect("gpu");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => state.resize(size),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                let w = state.width.max(1) as f32;
                let h = state.height.max(1) as f32;
                state.set_pointer_target(Vec2::new(
                    (position.x as f32 / w) * 2.0 - 1.0,
                    -(position.y as f32 / h) * 2.0 + 1.0,
                ));
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(KeyCode::Space),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => {
                if let Some(a) = &audio {
                    a.toggle();
                }
            }
            Event::AboutToWait => match state.render() {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            },
            _ => {}
        })
        .unwrap();
}

// ---------------- Native audio (cpal) ----------------

/// A one-shot percussive voice scheduled at an absolute sample position.
enum VoiceKind {
    Kick { phase: f32 },
    Noise { samples: Vec<f32> },
}

struct BeatVoice {
    start_sample: u64,
    total_samples: u32,
    emitted: u32,
    kind: VoiceKind,
}

struct AudioState {
    sample_rate: f32,
    clock_samples: u64, // advanced by the output callback
    scheduler: BeatScheduler,
    voices: Vec<BeatVoice>,
}

pub struct BeatAudio {
    state: Arc<Mutex<AudioState>>,
    _stream: cpal::Stream,
}

impl BeatAudio {
    /// Flip playback; activation re-seeds the beat grid at the current
    /// stream clock. In-flight voices always decay naturally.
    fn toggle(&self) {
        let mut guard = self.state.lock().unwrap();
        if guard.scheduler.is_playing() {
            guard.scheduler.stop();
            log::info!("[beat] stopped");
        } else {
            let now_sec = guard.clock_samples as f64 / guard.sample_rate as f64;
            guard.scheduler.start(now_sec);
            log::info!("[beat] started at {:.3}s", now_sec);
        }
    }
}

fn start_audio_engine() -> Option<BeatAudio> {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let config = device.default_output_config().ok()?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        log::error!("unsupported sample format: {:?}", config.sample_format());
        return None;
    }
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let state = Arc::new(Mutex::new(AudioState {
        sample_rate,
        clock_samples: 0,
        scheduler: BeatScheduler::new(),
        voices: Vec::new(),
    }));

    // Scheduler thread: poll every lookahead interval, drain due beats into
    // sample-stamped voices
    {
        let state_clone = Arc::clone(&state);
        thread::Builder::new()
            .name("beat-scheduler".into())
            .spawn(move || {
                let mut rng = StdRng::seed_from_u64(0x1234_ABCD);
                let mut events: Vec<BeatEvent> = Vec::new();
                loop {
                    let lookahead = {
                        let mut guard = state_clone.lock().unwrap();
                        let sr = guard.sample_rate;
                        let now_sec = guard.clock_samples as f64 / sr as f64;
                        events.clear();
                        guard.scheduler.schedule(now_sec, &mut events);
                        for ev in &events {
                            push_beat_voices(&mut guard.voices, ev, sr, &mut rng);
                        }
                        guard.scheduler.lookahead()
                    };
                    thread::sleep(lookahead);
                }
            })
            .ok()?;
    }

    let err_fn = |err| log::error!("audio stream error: {err}");
    let state_for_stream = Arc::clone(&state);
    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let mut guard = state_for_stream.lock().unwrap();
                let mut frame = 0usize;
                while frame < data.len() {
                    let s = mix_sample(&mut guard);
                    for ch in 0..channels {
                        if frame + ch < data.len() {
                            data[frame + ch] = s;
                        }
                    }
                    guard.clock_samples += 1;
                    frame += channels;
                }
            },
            err_fn,
            None,
        )
        .ok()?;
    stream.play().ok()?;

    Some(BeatAudio {
        state,
        _stream: stream,
    })
}

fn push_beat_voices<R: Rng>(voices: &mut Vec<BeatVoice>, ev: &BeatEvent, sr: f32, rng: &mut R) {
    let start_sample = (ev.start_time_sec * sr as f64).max(0.0) as u64;
    voices.push(BeatVoice {
        start_sample,
        total_samples: (KICK_DURATION_SEC * sr as f64) as u32,
        emitted: 0,
        kind: VoiceKind::Kick { phase: 0.0 },
    });
    let noise_len = (NOISE_DURATION_SEC * sr as f64) as u32;
    let mut samples = vec![0.0f32; noise_len as usize];
    fill_noise(&mut samples, rng);
    voices.push(BeatVoice {
        start_sample,
        total_samples: noise_len,
        emitted: 0,
        kind: VoiceKind::Noise { samples },
    });
}

/// Mix one output sample at the current stream clock, retiring finished
/// voices. Envelopes mirror the WebAudio exponential ramps.
fn mix_sample(state: &mut AudioState) -> f32 {
    let now = state.clock_samples;
    let sr = state.sample_rate;
    let mut acc = 0.0f32;
    let mut i = 0usize;
    while i < state.voices.len() {
        let voice = &mut state.voices[i];
        if now < voice.start_sample {
            i += 1;
            continue;
        }
        let t = voice.emitted as f64 / sr as f64;
        match &mut voice.kind {
            VoiceKind::Kick { phase } => {
                let freq = exp_ramp(KICK_START_HZ, KICK_END_HZ, t, KICK_DURATION_SEC);
                let gain = exp_ramp(KICK_GAIN, ENVELOPE_FLOOR, t, KICK_DURATION_SEC);
                acc += phase.sin() * gain;
                *phase += std::f32::consts::TAU * freq / sr;
                if *phase > std::f32::consts::TAU {
                    *phase -= std::f32::consts::TAU;
                }
            }
            VoiceKind::Noise { samples } => {
                let gain = exp_ramp(NOISE_GAIN, ENVELOPE_FLOOR, t, NOISE_DURATION_SEC);
                acc += samples[voice.emitted as usize] * gain;
            }
        }
        voice.emitted += 1;
        if voice.emitted >= voice.total_samples {
            state.voices.swap_remove(i);
            continue;
        }
        i += 1;
    }
    acc.tanh()
}
