//! Grader configuration.
//!
//! Defaults match the exercise handout; each field can be overridden with a
//! `TIDELAB_*` environment variable (a `.env` file is honored via dotenvy in
//! the CLI entry point), so the same binary grades other course editions.

#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// Notebook file name looked up at the submission root and under `src/`.
    pub notebook_name: String,
    /// Moored CTD NetCDF file name, expected under `data/`.
    pub ctd_filename: String,
    /// Mooring velocity NetCDF file name, expected under `data/`.
    pub velocity_filename: String,
    /// Required figure file prefix, e.g. `ex3fig`.
    pub figure_prefix: String,
    /// Course tag that ends every figure name, e.g. `Messfern`.
    pub figure_tag: String,
    /// Number of required figures, numbered from 1.
    pub figure_count: usize,
    /// Minimum number of time samples for a dataset to count as substantial.
    pub min_series_len: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            notebook_name: "assignment.ipynb".to_string(),
            ctd_filename: "mooredCTD1_raw.nc".to_string(),
            velocity_filename: "mooring1velocity.nc".to_string(),
            figure_prefix: "ex3fig".to_string(),
            figure_tag: "Messfern".to_string(),
            figure_count: 4,
            min_series_len: 100,
        }
    }
}

impl GraderConfig {
    /// Builds the config from defaults plus any `TIDELAB_*` overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("TIDELAB_NOTEBOOK_NAME") {
            config.notebook_name = v;
        }
        if let Ok(v) = std::env::var("TIDELAB_CTD_FILENAME") {
            config.ctd_filename = v;
        }
        if let Ok(v) = std::env::var("TIDELAB_VELOCITY_FILENAME") {
            config.velocity_filename = v;
        }
        if let Ok(v) = std::env::var("TIDELAB_FIGURE_PREFIX") {
            config.figure_prefix = v;
        }
        if let Ok(v) = std::env::var("TIDELAB_FIGURE_TAG") {
            config.figure_tag = v;
        }
        if let Ok(v) = std::env::var("TIDELAB_FIGURE_COUNT") {
            if let Ok(n) = v.parse() {
                config.figure_count = n;
            }
        }
        if let Ok(v) = std::env::var("TIDELAB_MIN_SERIES_LEN") {
            if let Ok(n) = v.parse() {
                config.min_series_len = n;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_handout() {
        let config = GraderConfig::default();
        assert_eq!(config.notebook_name, "assignment.ipynb");
        assert_eq!(config.ctd_filename, "mooredCTD1_raw.nc");
        assert_eq!(config.velocity_filename, "mooring1velocity.nc");
        assert_eq!(config.figure_count, 4);
        assert_eq!(config.figure_tag, "Messfern");
    }
}
