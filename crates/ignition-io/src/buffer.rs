//! Planar multi-channel sample buffers.

use crate::{Error, Result};

/// Planar audio: one `Vec<f32>` per channel, all the same length.
///
/// # Example
///
/// ```rust
/// use ignition_io::AudioBuffer;
///
/// let buffer = AudioBuffer::from_interleaved(&[0.1, -0.1, 0.2, -0.2], 2).unwrap();
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frames(), 2);
/// assert_eq!(buffer.channel(1), Some(&[-0.1, -0.2][..]));
/// assert_eq!(buffer.to_interleaved(), vec![0.1, -0.1, 0.2, -0.2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build from per-channel sample vectors.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyChannels`] for zero channels and
    /// [`Error::ChannelLengthMismatch`] for ragged channels.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self> {
        let expected = channels.first().ok_or(Error::EmptyChannels)?.len();
        if let Some((channel, got)) = channels
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(Error::ChannelLengthMismatch {
                channel,
                expected,
                got,
            });
        }
        Ok(Self { channels })
    }

    /// Silent buffer of `channels × frames`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyChannels`] for zero channels.
    pub fn silence(channels: usize, frames: usize) -> Result<Self> {
        if channels == 0 {
            return Err(Error::EmptyChannels);
        }
        Ok(Self {
            channels: vec![vec![0.0; frames]; channels],
        })
    }

    /// Deinterleave `samples` into `channels` planes.
    ///
    /// A trailing partial frame is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyChannels`] for zero channels.
    pub fn from_interleaved(samples: &[f32], channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(Error::EmptyChannels);
        }
        let frames = samples.len() / channels;
        let mut planes = vec![Vec::with_capacity(frames); channels];
        for frame in samples.chunks_exact(channels) {
            for (plane, &sample) in planes.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }
        Ok(Self { channels: planes })
    }

    /// Interleave all channels frame by frame.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channel_count());
        for i in 0..self.frames() {
            for plane in &self.channels {
                out.push(plane[i]);
            }
        }
        out
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// One channel's samples.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable access to all channels.
    ///
    /// Lengths cannot be changed through this slice.
    pub fn channels_mut(&mut self) -> Vec<&mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice).collect()
    }

    /// Consume into per-channel vectors.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Peak absolute sample over all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// RMS level over all channels.
    pub fn rms(&self) -> f32 {
        let count = self.frames() * self.channel_count();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .channels
            .iter()
            .flatten()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum / count as f64).sqrt() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_ragged() {
        assert!(matches!(
            AudioBuffer::from_channels(vec![]),
            Err(Error::EmptyChannels)
        ));
        assert!(matches!(
            AudioBuffer::from_channels(vec![vec![0.0; 4], vec![0.0; 3]]),
            Err(Error::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                got: 3
            })
        ));
        assert!(matches!(
            AudioBuffer::from_interleaved(&[0.0; 4], 0),
            Err(Error::EmptyChannels)
        ));
    }

    #[test]
    fn deinterleave_drops_partial_frame() {
        let buffer = AudioBuffer::from_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 3).unwrap();
        assert_eq!(buffer.frames(), 2);
        assert_eq!(buffer.channel(0), Some(&[1.0, 4.0][..]));
        assert_eq!(buffer.channel(2), Some(&[3.0, 6.0][..]));
        assert_eq!(buffer.to_interleaved(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn levels() {
        let buffer = AudioBuffer::from_channels(vec![vec![0.5, -0.5], vec![-1.0, 1.0]]).unwrap();
        assert_eq!(buffer.peak(), 1.0);
        let expected = ((0.25 + 0.25 + 1.0 + 1.0) / 4.0f32).sqrt();
        assert!((buffer.rms() - expected).abs() < 1e-6);

        let silent = AudioBuffer::silence(2, 0).unwrap();
        assert!(silent.is_empty());
        assert_eq!(silent.rms(), 0.0);
    }
}
