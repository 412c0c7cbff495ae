//! Duration alignment for audio-track replacement
//!
//! When a replacement audio track and the target video disagree in length,
//! the audio is never stretched or looped. Longer audio is cut at the video's
//! end; shorter audio simply runs out and the rest of the video plays without
//! a replacement track. Both are deliberate policy, not side effects.

use crate::error::FetchmuxError;

/// Durations of the two tracks being combined, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPair {
    pub video_duration: f64,
    pub audio_duration: f64,
}

impl TrackPair {
    /// Build a pair, rejecting negative or non-finite durations
    pub fn new(video_duration: f64, audio_duration: f64) -> Result<Self, FetchmuxError> {
        if !video_duration.is_finite() || video_duration < 0.0 {
            return Err(FetchmuxError::ProbeFailed(format!(
                "invalid video duration: {}",
                video_duration
            )));
        }
        if !audio_duration.is_finite() || audio_duration < 0.0 {
            return Err(FetchmuxError::ProbeFailed(format!(
                "invalid audio duration: {}",
                audio_duration
            )));
        }
        Ok(Self {
            video_duration,
            audio_duration,
        })
    }
}

/// How to reconcile the two durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentDecision {
    /// Cut the audio at exactly this many seconds (the video's length)
    Truncate { at: f64 },
    /// Audio ends before the video does; the remainder plays silent
    AllowTrailingSilence,
    /// Durations already match
    NoChange,
}

/// Pure comparison of the two durations. No rounding, no I/O.
pub fn align_tracks(pair: TrackPair) -> AlignmentDecision {
    if pair.audio_duration > pair.video_duration {
        AlignmentDecision::Truncate {
            at: pair.video_duration,
        }
    } else if pair.audio_duration < pair.video_duration {
        AlignmentDecision::AllowTrailingSilence
    } else {
        AlignmentDecision::NoChange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_audio_is_truncated_at_video_length() {
        let pair = TrackPair::new(120.0, 150.0).unwrap();
        assert_eq!(
            align_tracks(pair),
            AlignmentDecision::Truncate { at: 120.0 }
        );
    }

    #[test]
    fn test_truncate_point_is_exact() {
        // No rounding beyond input precision
        let pair = TrackPair::new(119.987, 120.0).unwrap();
        match align_tracks(pair) {
            AlignmentDecision::Truncate { at } => assert_eq!(at, 119.987),
            other => panic!("expected Truncate, got {:?}", other),
        }
    }

    #[test]
    fn test_shorter_audio_leaves_trailing_silence() {
        let pair = TrackPair::new(120.0, 95.0).unwrap();
        assert_eq!(align_tracks(pair), AlignmentDecision::AllowTrailingSilence);
    }

    #[test]
    fn test_equal_durations_need_no_change() {
        let pair = TrackPair::new(88.25, 88.25).unwrap();
        assert_eq!(align_tracks(pair), AlignmentDecision::NoChange);
    }

    #[test]
    fn test_zero_durations_are_valid() {
        let pair = TrackPair::new(0.0, 0.0).unwrap();
        assert_eq!(align_tracks(pair), AlignmentDecision::NoChange);
    }

    #[test]
    fn test_invalid_durations_are_rejected() {
        assert!(TrackPair::new(-1.0, 10.0).is_err());
        assert!(TrackPair::new(10.0, f64::NAN).is_err());
        assert!(TrackPair::new(f64::INFINITY, 10.0).is_err());
    }
}
