use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Explicit path to the yt-dlp binary; when unset the binary is probed
    /// on `$PATH`.
    pub ytdlp_path: Option<PathBuf>,
    /// Upper bound on simultaneously running extractor subprocesses.
    pub ytdlp_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let ytdlp_path = std::env::var("YTDLP_PATH").ok().map(PathBuf::from);
        let ytdlp_concurrency: usize = std::env::var("YTDLP_CONCURRENCY")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .unwrap_or(4);

        Self {
            host,
            port,
            ytdlp_path,
            ytdlp_concurrency,
        }
    }
}
