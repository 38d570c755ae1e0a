//! AnalyticsPipeline: the per-frame loop from raw detections to a report.

use image::RgbImage;
use tracing::{debug, info, warn};

use super::{DetectionFilter, Detector, FrameSink, FrameSource, Tracker, VideoInfo};
use crate::analytics::{Aggregates, FinalizedHeatmap, InsightsReport};
use crate::annotate::FrameAnnotator;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::tracker::SortTracker;

/// Everything a finished run produces besides the encoded video.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub video: VideoInfo,
    pub frames_processed: u64,
    /// Detections that passed the class/confidence filter, over all frames
    pub detections_retained: u64,
    pub report: InsightsReport,
    pub heatmap: FinalizedHeatmap,
}

/// Bundles a detector and a tracker with the analytics aggregates.
///
/// The detector is kept across runs; the tracker is reset and all aggregates
/// are rebuilt at the start of every [`run`](Self::run), so a pipeline can be
/// reused for many videos.
pub struct AnalyticsPipeline<D: Detector, T: Tracker> {
    detector: D,
    tracker: T,
    filter: DetectionFilter,
    annotator: FrameAnnotator,
    config: PipelineConfig,
}

impl<D: Detector, T: Tracker> AnalyticsPipeline<D, T> {
    /// Create a pipeline. Fails if `config` does not validate.
    pub fn new(detector: D, tracker: T, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            detector,
            tracker,
            filter: config.detection_filter(),
            annotator: FrameAnnotator::new(config.annotation.clone()),
            config,
        })
    }

    /// Replace the annotator, e.g. with one that carries a label font.
    pub fn with_annotator(mut self, annotator: FrameAnnotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Process every frame of `source`, writing annotated frames to `sink`.
    ///
    /// The loop ends when the source is exhausted. Detector, tracker, source
    /// and sink failures abort the run, as does a track whose box is not
    /// finite or has negative extent. A track that cannot be drawn is logged
    /// and skipped.
    pub fn run<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> Result<PipelineOutput, PipelineError>
    where
        S: FrameSource,
        K: FrameSink,
    {
        let video = source.info();
        if video.width == 0 || video.height == 0 || video.fps.is_nan() || video.fps <= 0.0 {
            return Err(PipelineError::InvalidVideo {
                width: video.width,
                height: video.height,
                fps: video.fps,
            });
        }
        info!(
            width = video.width,
            height = video.height,
            fps = video.fps,
            frames = video.frame_count,
            "starting analytics run"
        );

        self.tracker.reset();
        let mut aggregates =
            Aggregates::new(video.width, video.height, video.fps, self.config.bucket_seconds);
        let mut frame_index = 0u64;
        let mut detections_retained = 0u64;

        while let Some(mut frame) = source
            .next_frame()
            .map_err(|e| PipelineError::Source(Box::new(e)))?
        {
            let retained = self.process_frame(&mut frame, frame_index, &mut aggregates)?;
            detections_retained += retained as u64;
            sink.write_frame(&frame)
                .map_err(|e| PipelineError::Sink(Box::new(e)))?;
            frame_index += 1;
        }
        sink.finish().map_err(|e| PipelineError::Sink(Box::new(e)))?;

        let params = self.config.insights_params(video.fps);
        let (report, heatmap) = aggregates.finish(&params);
        info!(
            frames = frame_index,
            people = report.total_people,
            avg_dwell_sec = report.avg_time_in_frame_sec,
            "analytics run complete"
        );

        Ok(PipelineOutput {
            video,
            frames_processed: frame_index,
            detections_retained,
            report,
            heatmap,
        })
    }

    /// Detect, track, aggregate and annotate one frame. Returns the number of
    /// detections handed to the tracker.
    fn process_frame(
        &mut self,
        frame: &mut RgbImage,
        frame_index: u64,
        aggregates: &mut Aggregates,
    ) -> Result<usize, PipelineError> {
        let raw = self
            .detector
            .detect(frame)
            .map_err(|e| PipelineError::Detector {
                frame: frame_index,
                source: Box::new(e),
            })?;
        let detections = self.filter.apply(&raw);

        let tracks = self
            .tracker
            .update(&detections, frame)
            .map_err(|e| PipelineError::Tracker {
                frame: frame_index,
                source: Box::new(e),
            })?;

        if let Some(bad) = tracks.iter().find(|t| !t.rect.is_well_formed()) {
            return Err(PipelineError::MalformedTrack {
                frame: frame_index,
                track_id: bad.track_id.clone(),
            });
        }

        let mut confirmed = 0usize;
        for track in tracks.iter().filter(|t| t.confirmed) {
            confirmed += 1;
            let (cx, cy) = track.centroid();
            aggregates.observe(&track.track_id, cx, cy, frame_index);

            if let Err(e) = self.annotator.annotate(frame, track) {
                warn!(frame = frame_index, error = %e, "skipping track annotation");
            }
        }

        debug!(
            frame = frame_index,
            raw = raw.len(),
            retained = detections.len(),
            tracks = tracks.len(),
            confirmed,
            "frame processed"
        );
        Ok(detections.len())
    }
}

impl<D: Detector> AnalyticsPipeline<D, SortTracker> {
    /// Pipeline using the built-in tracker configured from `config.tracker`.
    pub fn with_sort_tracker(detector: D, config: PipelineConfig) -> Result<Self, PipelineError> {
        let tracker = SortTracker::new(config.tracker.clone());
        Self::new(detector, tracker, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{Detection, Track, TrackerInput, VecFrameSink, VecFrameSource};

    struct MockDetector {
        detections: Vec<Detection>,
    }

    impl Detector for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
            Ok(self.detections.clone())
        }
    }

    /// Confirms every input immediately under a fixed id.
    struct EchoTracker;

    impl Tracker for EchoTracker {
        type Error = std::convert::Infallible;

        fn update(
            &mut self,
            detections: &[TrackerInput],
            _frame: &RgbImage,
        ) -> Result<Vec<Track>, Self::Error> {
            Ok(detections
                .iter()
                .enumerate()
                .map(|(i, d)| Track::new(format!("E{i}"), d.rect, true))
                .collect())
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn test_pipeline_runs_all_frames() {
        let detector = MockDetector {
            detections: vec![
                Detection::new(10.0, 20.0, 30.0, 40.0, 0.9, "person"),
                Detection::new(0.0, 0.0, 5.0, 5.0, 0.9, "dog"),
            ],
        };
        let mut pipeline =
            AnalyticsPipeline::new(detector, EchoTracker, PipelineConfig::default()).unwrap();

        let mut source = VecFrameSource::blank(64, 48, 10.0, 12);
        let mut sink = VecFrameSink::default();
        let output = pipeline.run(&mut source, &mut sink).unwrap();

        assert_eq!(output.frames_processed, 12);
        assert_eq!(output.detections_retained, 12);
        assert_eq!(sink.frames.len(), 12);
        assert!(sink.finished);
        assert_eq!(output.report.total_people, 1);
        assert_eq!(output.report.most_visited_point, (20, 30));
        assert_eq!(output.report.avg_time_in_frame_sec, 1.2);
        assert_eq!(sink.frames[0].get_pixel(10, 20), &image::Rgb([0, 255, 0]));
    }

    #[test]
    fn test_invalid_video_rejected() {
        let detector = MockDetector { detections: vec![] };
        let mut pipeline =
            AnalyticsPipeline::new(detector, EchoTracker, PipelineConfig::default()).unwrap();
        let mut source = VecFrameSource::blank(64, 48, 0.0, 1);
        let mut sink = VecFrameSink::default();
        assert!(matches!(
            pipeline.run(&mut source, &mut sink),
            Err(PipelineError::InvalidVideo { .. })
        ));
    }

    #[test]
    fn test_sort_tracker_pipeline() {
        let detector = MockDetector {
            detections: vec![Detection::new(100.0, 100.0, 140.0, 180.0, 0.9, "person")],
        };
        let mut pipeline =
            AnalyticsPipeline::with_sort_tracker(detector, PipelineConfig::default()).unwrap();

        let mut source = VecFrameSource::blank(320, 240, 30.0, 30);
        let mut sink = VecFrameSink::default();
        let output = pipeline.run(&mut source, &mut sink).unwrap();

        // confirmed from the third frame onwards: frames 2..=29
        assert_eq!(output.report.total_people, 1);
        assert_eq!(output.report.avg_time_in_frame_sec, 0.93);
        assert_eq!(output.report.most_visited_point, (120, 140));
    }
}
