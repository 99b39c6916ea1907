// Shared visual/audio tuning constants used by both the web and native frontends.

// Particle field
pub const DEFAULT_PARTICLE_COUNT: usize = 50_000;
pub const FIELD_RADIUS: f32 = 15.0; // soft containment boundary
pub const MAX_DRIFT_SPEED: f32 = 0.005; // per-axis initial velocity bound
pub const MAX_POINT_SIZE: f32 = 2.0;
pub const BASE_COLOR: [f32; 3] = [0.3, 0.7, 1.0]; // cool teal

// Camera and near-field fading
pub const CAMERA_DISTANCE: f32 = 15.0; // camera sits at +Z looking at the origin
pub const NEAR_FADE_DISTANCE: f32 = 3.0; // particles closer than this are hidden
pub const SIZE_PER_UNIT: f32 = 0.2; // rendered size per unit of camera distance

// Pointer repulsion
pub const POINTER_WORLD_SCALE: f32 = 10.0; // normalized [-1,1] pointer -> world units
pub const REPEL_RADIUS: f32 = 3.0;
pub const REPEL_STRENGTH: f32 = 1.0 / 30.0;

// Soft containment pull-back per frame once outside FIELD_RADIUS
pub const PULLBACK_FACTOR: f32 = 0.95;

// Recoloring
pub const HUE_SATURATION: f32 = 0.7;
pub const HUE_LIGHTNESS: f32 = 0.6;

// Host loop pacing
pub const POINTER_SMOOTHING: f32 = 0.05; // per-frame lerp toward the raw pointer
pub const TIME_STEP: f32 = 0.01; // elapsed-time accumulation per frame at speed 1
pub const ROTATION_RATE_Y: f32 = 0.002; // whole-field yaw per frame at speed 1
pub const ROTATION_RATE_X: f32 = 0.001; // whole-field pitch per frame at speed 1
pub const POINT_WORLD_SIZE: f32 = 0.1; // world units per unit of particle size

// Beat scheduler
pub const DEFAULT_TEMPO_BPM: f32 = 120.0;
pub const LOOKAHEAD_MS: u64 = 25; // scheduler poll interval
pub const SCHEDULE_AHEAD_SEC: f64 = 0.1; // how far ahead beats are pre-scheduled

// Beat synthesis: tonal kick + short noise burst per beat
pub const KICK_START_HZ: f32 = 150.0;
pub const KICK_END_HZ: f32 = 0.01;
pub const KICK_GAIN: f32 = 0.3;
pub const KICK_DURATION_SEC: f64 = 0.5;
pub const NOISE_GAIN: f32 = 0.05;
pub const NOISE_DURATION_SEC: f64 = 0.05;
pub const ENVELOPE_FLOOR: f32 = 0.01; // exponential ramps land here, never zero
