//! One analysis-and-render cycle: prepare → analyze → render.

use std::time::{Duration, Instant};

use scopekit_core::{
    FrameAnalysis, FrameError, OwnedFrame, ScopeConfig, ScopeImages, ScopeScratch, analyze, frame,
    render_scopes,
};

use crate::controls::ControlSnapshot;

/// Cycle timing counters. Logged at most once per second unless a cycle is slow.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Cycles that produced images.
    pub cycles: u64,
    /// Cycles skipped because of invalid input or nothing visible.
    pub skipped: u64,
    pub last_duration: Duration,
    pub total_time: Duration,
    pub slow_cycle_threshold: Duration,
    last_log_at: Instant,
}

impl Default for CycleStats {
    fn default() -> Self {
        Self {
            cycles: 0,
            skipped: 0,
            last_duration: Duration::ZERO,
            total_time: Duration::ZERO,
            slow_cycle_threshold: Duration::from_millis(50),
            last_log_at: Instant::now(),
        }
    }
}

impl CycleStats {
    fn record(&mut self, elapsed: Duration, analysis: &FrameAnalysis) {
        self.cycles += 1;
        self.last_duration = elapsed;
        self.total_time += elapsed;

        if elapsed >= self.slow_cycle_threshold || self.last_log_at.elapsed().as_secs_f32() >= 1.0 {
            tracing::info!(
                "scope cycle: {:.2}ms (cycle #{}, {}x{}, {} chroma samples)",
                elapsed.as_secs_f64() * 1000.0,
                self.cycles,
                analysis.width,
                analysis.height,
                analysis.points.len()
            );
            self.last_log_at = Instant::now();
        }
    }

    fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Mean duration of the cycles that produced images.
    pub fn mean_duration(&self) -> Duration {
        match u32::try_from(self.cycles) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_time / n,
            Err(_) => Duration::ZERO,
        }
    }
}

/// Owns the configuration and the reusable render scratch for a stream of cycles.
#[derive(Debug, Clone)]
pub struct ScopePipeline {
    config: ScopeConfig,
    scratch: ScopeScratch,
    stats: CycleStats,
}

impl ScopePipeline {
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            config: config.sanitized(),
            scratch: ScopeScratch::new(),
            stats: CycleStats::default(),
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run one cycle over `frame` using the controls captured at cycle start.
    ///
    /// Returns `None` when the cycle is skipped: the frame is unusable or no
    /// scope is visible. A skipped cycle leaves no partial output behind.
    pub fn run_cycle(&mut self, source: &OwnedFrame, controls: ControlSnapshot) -> Option<ScopeImages> {
        if !controls.visibility.any() {
            self.stats.record_skip();
            return None;
        }

        let start = Instant::now();
        let analysis = match self.analyze_frame(source, controls) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::debug!("skipping scope cycle: {e}");
                self.stats.record_skip();
                return None;
            }
        };

        let luma = analysis.histogram.luma_summary();
        tracing::debug!(
            "luma mean {:.1}, {} crushed, {} clipped",
            luma.mean,
            luma.crushed,
            luma.clipped
        );

        let images = render_scopes(&analysis, &self.config, controls.visibility, &mut self.scratch);
        self.stats.record(start.elapsed(), &analysis);
        Some(images)
    }

    fn analyze_frame(
        &self,
        source: &OwnedFrame,
        controls: ControlSnapshot,
    ) -> Result<FrameAnalysis, FrameError> {
        let prepared = frame::prepare(&source.view()?, controls.crop, self.config.max_analysis_width)?;
        analyze(&prepared.view()?, self.config.vector_sample_budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopekit_core::color::Rgb8;
    use scopekit_core::{CropRegion, PixelLayout, ScopeKind, ScopeVisibility};

    fn controls() -> ControlSnapshot {
        ControlSnapshot {
            crop: None,
            visibility: ScopeVisibility::default(),
        }
    }

    #[test]
    fn test_cycle_renders_all_visible_scopes() {
        let mut pipeline = ScopePipeline::new(ScopeConfig::default());
        let frame = OwnedFrame::solid(64, 36, Rgb8::new(120, 60, 30));
        let images = pipeline.run_cycle(&frame, controls()).unwrap();
        assert_eq!(images.len(), 4);
        assert_eq!(pipeline.stats().cycles, 1);
        assert_eq!(pipeline.stats().skipped, 0);
    }

    #[test]
    fn test_hidden_scopes_are_not_rendered() {
        let mut pipeline = ScopePipeline::new(ScopeConfig::default());
        let frame = OwnedFrame::solid(8, 8, Rgb8::new(1, 2, 3));
        let mut snapshot = controls();
        snapshot.visibility.set(ScopeKind::Parade, false);
        snapshot.visibility.set(ScopeKind::Histogram, false);
        let images = pipeline.run_cycle(&frame, snapshot).unwrap();
        assert!(images.get(ScopeKind::Waveform).is_some());
        assert!(images.get(ScopeKind::Parade).is_none());
        assert!(images.get(ScopeKind::Histogram).is_none());
    }

    #[test]
    fn test_nothing_visible_skips_cycle() {
        let mut pipeline = ScopePipeline::new(ScopeConfig::default());
        let frame = OwnedFrame::solid(8, 8, Rgb8::new(1, 2, 3));
        let snapshot = ControlSnapshot {
            crop: None,
            visibility: ScopeVisibility::NONE,
        };
        assert!(pipeline.run_cycle(&frame, snapshot).is_none());
        assert_eq!(pipeline.stats().skipped, 1);
    }

    #[test]
    fn test_invalid_frame_skips_cycle() {
        let mut pipeline = ScopePipeline::new(ScopeConfig::default());
        let broken = OwnedFrame::new(4, 4, PixelLayout::Rgba, vec![0; 7]);
        assert!(pipeline.run_cycle(&broken, controls()).is_none());
        let empty = OwnedFrame::new(0, 0, PixelLayout::Rgb, Vec::new());
        assert!(pipeline.run_cycle(&empty, controls()).is_none());
        assert_eq!(pipeline.stats().skipped, 2);
        assert_eq!(pipeline.stats().cycles, 0);
    }

    #[test]
    fn test_crop_restricts_analysis() {
        // Left half black, right half white; cropping to the right half
        // leaves only white in the histogram.
        let (w, h) = (40u32, 20u32);
        let mut data = Vec::new();
        for _y in 0..h {
            for x in 0..w {
                let v = if x < w / 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let frame = OwnedFrame::new(w, h, PixelLayout::Rgb, data);
        let pipeline = ScopePipeline::new(ScopeConfig::default());
        let snapshot = ControlSnapshot {
            crop: Some(CropRegion::new(0.5, 0.0, 0.5, 1.0)),
            visibility: ScopeVisibility::default(),
        };
        let analysis = pipeline.analyze_frame(&frame, snapshot).unwrap();
        assert_eq!(analysis.histogram.lum[255], 20 * 20);
        assert_eq!(analysis.histogram.lum[0], 0);
    }

    #[test]
    fn test_large_frame_is_capped() {
        let pipeline = ScopePipeline::new(ScopeConfig::default());
        let frame = OwnedFrame::solid(1920, 1080, Rgb8::new(9, 9, 9));
        let analysis = pipeline.analyze_frame(&frame, controls()).unwrap();
        assert_eq!((analysis.width, analysis.height), (320, 180));
    }

    #[test]
    fn test_mean_duration() {
        let mut stats = CycleStats::default();
        assert_eq!(stats.mean_duration(), Duration::ZERO);
        stats.cycles = 2;
        stats.total_time = Duration::from_millis(10);
        assert_eq!(stats.mean_duration(), Duration::from_millis(5));
    }
}
