//! Sound cues: synthesised once with fundsp, played through rodio.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};
use tracing::{info, warn};

const SAMPLE_RATE: u32 = 44_100;

/// Sound effects the game triggers.
pub trait Sfx {
    fn play_hit(&mut self);
    fn play_success(&mut self);
    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Flip the mute flag and return the new state.
    fn toggle_mute(&mut self) -> bool {
        let muted = !self.is_muted();
        self.set_muted(muted);
        muted
    }
}

/// A pre-rendered mono clip with its playback volume.
pub struct Cue {
    samples: Vec<f32>,
    volume: f32,
}

impl Cue {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

fn render(mut unit: impl AudioUnit, seconds: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (seconds * SAMPLE_RATE as f64) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

/// Falling sawtooth thud: 400 Hz down to 80 Hz, fading out over half a second.
pub fn hit_cue() -> Cue {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.8, 0.0, (t / 0.5).min(1.0)));
    Cue {
        samples: render((freq >> saw()) * gain, 0.5),
        volume: 0.3,
    }
}

/// Short upward sine chirp, 880 Hz to 1320 Hz.
pub fn success_cue() -> Cue {
    let freq = lfo(|t: f32| lerp(880.0, 1320.0, (t / 0.1).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.8, 0.0, (t / 0.25).min(1.0)));
    Cue {
        samples: render((freq >> sine::<f32>()) * gain, 0.25),
        volume: 0.2,
    }
}

struct Output {
    // Dropping the stream stops playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Plays cues on the default output device, or stays silent when there is
/// none.
pub struct Audio {
    output: Option<Output>,
    hit: Cue,
    success: Cue,
    muted: bool,
}

impl Audio {
    /// Open the default device. Failure leaves the game silent.
    pub fn open(muted: bool) -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                info!("audio output opened");
                Some(Output {
                    _stream: stream,
                    handle,
                })
            }
            Err(e) => {
                warn!("no audio output, continuing without sound: {e}");
                None
            }
        };
        Self {
            output,
            hit: hit_cue(),
            success: success_cue(),
            muted,
        }
    }

    /// An instance that never touches an audio device.
    pub fn silent() -> Self {
        Self {
            output: None,
            hit: hit_cue(),
            success: success_cue(),
            muted: false,
        }
    }

    fn play(&self, cue: &Cue) {
        if self.muted {
            return;
        }
        let Some(output) = &self.output else {
            return;
        };
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.set_volume(cue.volume);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, cue.samples.clone()));
                sink.detach();
            }
            Err(e) => warn!("could not play sound: {e}"),
        }
    }
}

impl Sfx for Audio {
    fn play_hit(&mut self) {
        self.play(&self.hit);
    }

    fn play_success(&mut self) {
        self.play(&self.success);
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
