/// Sound effects: short procedural chiptune cues played through rodio.
///
/// Every cue is rendered to an in-memory WAV buffer once at startup and
/// played fire-and-forget on a detached Sink. Coin pickups are pitched by
/// denomination.
///
/// Without the `sound` feature the stub SoundEngine does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::coin::Denomination;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Indexed like `Denomination::ALL`.
        sfx_coin: [Arc<Vec<u8>>; 3],
        sfx_replenish: Arc<Vec<u8>>,
        sfx_relocate: Arc<Vec<u8>>,
        sfx_bump: Arc<Vec<u8>>,
        sfx_unlock: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let wav = |samples: Vec<f32>| Arc::new(make_wav(&samples));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_coin: Denomination::ALL.map(|d| wav(gen_coin(d))),
                sfx_replenish: wav(gen_replenish()),
                sfx_relocate: wav(gen_relocate()),
                sfx_bump: wav(gen_bump()),
                sfx_unlock: wav(gen_unlock()),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                sink.append(src);
                sink.detach();
            }
        }

        pub fn play_coin(&self, value: Denomination) {
            let idx = Denomination::ALL.iter().position(|d| *d == value).unwrap_or(0);
            self.play(&self.sfx_coin[idx]);
        }

        pub fn play_replenish(&self) { self.play(&self.sfx_replenish); }
        pub fn play_relocate(&self) { self.play(&self.sfx_relocate); }
        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
        pub fn play_unlock(&self) { self.play(&self.sfx_unlock); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// Back-to-back notes of `(freq, seconds)`; `bright` mixes in a 3rd
    /// harmonic for a squarer tone.
    fn gen_notes(notes: &[(f32, f32)], bright: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * (1.0 - bright)
                    + (t * freq * 3.0 * TAU).sin() * bright;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Pickup arpeggio, an octave higher per tier.
    pub(super) fn gen_coin(value: Denomination) -> Vec<f32> {
        let base = match value {
            Denomination::Copper => 523.0_f32,
            Denomination::Silver => 784.0,
            Denomination::Gold => 1047.0,
        };
        let mut notes = vec![(base, 0.04), (base * 1.26, 0.04), (base * 1.5, 0.05)];
        if value == Denomination::Gold {
            notes.push((base * 2.0, 0.12));
        }
        gen_notes(&notes, 0.3, 0.25)
    }

    /// New wave of coins: rising four-note run.
    fn gen_replenish() -> Vec<f32> {
        gen_notes(&[(523.0, 0.07), (659.0, 0.07), (784.0, 0.07), (1047.0, 0.18)], 0.2, 0.28)
    }

    /// A coin hopping away: quick upward swoop.
    fn gen_relocate() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.12) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                phase += (300.0 + t * 900.0) / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - t).powf(0.6) * 0.2
            })
            .collect()
    }

    /// Walking into the edge: low noisy thud.
    fn gen_bump() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.08) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let tone = (ti * 110.0 * TAU).sin();
                (tone * 0.7 + noise * 0.3) * (1.0 - t) * 0.3
            })
            .collect()
    }

    /// Skin unlocked: two-note chime.
    fn gen_unlock() -> Vec<f32> {
        gen_notes(&[(784.0, 0.08), (1568.0, 0.2)], 0.15, 0.3)
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * num_channels as u32 * bits_per_sample as u32 / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_coin(&self, _value: crate::domain::coin::Denomination) {}
    pub fn play_replenish(&self) {}
    pub fn play_relocate(&self) {}
    pub fn play_bump(&self) {}
    pub fn play_unlock(&self) {}
}

#[cfg(all(test, feature = "sound"))]
mod tests {
    use super::inner::{gen_coin, make_wav};
    use crate::domain::coin::Denomination;

    #[test]
    fn wav_header_describes_pcm_mono() {
        let wav = make_wav(&[0.0, 1.0, -1.0, 2.0]);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 8);
        assert_eq!(wav.len(), 44 + 8);
        // out-of-range samples clamp
        assert_eq!(i16::from_le_bytes(wav[50..52].try_into().unwrap()), 32767);
    }

    #[test]
    fn gold_cue_is_longest() {
        let len = |d| gen_coin(d).len();
        assert!(len(Denomination::Gold) > len(Denomination::Silver));
        assert_eq!(len(Denomination::Copper), len(Denomination::Silver));
        assert!(gen_coin(Denomination::Copper).iter().all(|s| s.abs() <= 1.0));
    }
}
