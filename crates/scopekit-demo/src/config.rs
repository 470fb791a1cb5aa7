//! Runtime configuration for the demo.

use std::path::PathBuf;

use scopekit_core::CropRegion;

/// Default number of scope cycles to collect before writing output.
const DEFAULT_CYCLES: u32 = 3;
/// Default rate of the simulated capture source.
const DEFAULT_SOURCE_FPS: u32 = 30;
/// Default output directory for rendered scopes.
const DEFAULT_OUTPUT_DIR: &str = "scopes-out";

/// Demo settings, read from the command line and `SCOPEKIT_*` variables.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Still image to analyze. A generated test pattern is used when unset.
    pub input: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Optional JSON file for [`scopekit_core::ScopeConfig`].
    pub scope_config: Option<PathBuf>,
    pub cycles: u32,
    pub source_fps: u32,
    pub crop: Option<CropRegion>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            input: std::env::args_os()
                .nth(1)
                .map(PathBuf::from)
                .or_else(|| std::env::var_os("SCOPEKIT_INPUT").map(PathBuf::from)),
            output_dir: std::env::var_os("SCOPEKIT_OUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            scope_config: std::env::var_os("SCOPEKIT_CONFIG").map(PathBuf::from),
            cycles: std::env::var("SCOPEKIT_CYCLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_CYCLES),
            source_fps: std::env::var("SCOPEKIT_SOURCE_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_SOURCE_FPS),
            crop: std::env::var("SCOPEKIT_CROP")
                .ok()
                .and_then(|s| parse_crop(&s)),
        }
    }
}

/// Parse `x,y,w,h` fractions.
fn parse_crop(s: &str) -> Option<CropRegion> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<f32>().ok());
    let region = CropRegion::new(parts.next()??, parts.next()??, parts.next()??, parts.next()??);
    if parts.next().is_some() {
        return None;
    }
    Some(region.clamped())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crop() {
        assert_eq!(
            parse_crop("0.25, 0.25,0.5,0.5"),
            Some(CropRegion::new(0.25, 0.25, 0.5, 0.5))
        );
        assert_eq!(parse_crop("0.1,0.2,0.3"), None);
        assert_eq!(parse_crop("0.1,0.2,0.3,0.4,0.5"), None);
        assert_eq!(parse_crop("a,b,c,d"), None);
    }
}
