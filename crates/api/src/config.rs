use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the storage backend and JWT secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Remote classifier endpoint.
    pub classifier_url: String,
    /// Classifier request timeout in seconds (default: `20`).
    pub classifier_timeout_secs: u64,
    /// Artifact storage backend selection.
    pub storage: StorageConfig,
    /// Optional location-resolver endpoint. Absent means every scan is
    /// saved without a location.
    pub location_url: Option<String>,
    /// Location request timeout in seconds (default: `5`).
    pub location_timeout_secs: u64,
}

/// Which artifact storage backend to run against.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        base_dir: String,
        public_base_url: String,
    },
    S3 {
        bucket: String,
        region: String,
        public_base_url: String,
    },
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                        |
    /// |---------------------------|--------------------------------|
    /// | `HOST`                    | `0.0.0.0`                      |
    /// | `PORT`                    | `3000`                         |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                           |
    /// | `CLASSIFIER_URL`          | `http://localhost:8500/classify` |
    /// | `CLASSIFIER_TIMEOUT_SECS` | `20`                           |
    /// | `STORAGE_BACKEND`         | `local`                        |
    /// | `STORAGE_BASE_DIR`        | `./media`                      |
    /// | `STORAGE_PUBLIC_URL`      | `http://localhost:3000/media`  |
    /// | `S3_BUCKET`               | -- (required for `s3`)         |
    /// | `S3_REGION`               | -- (required for `s3`)         |
    /// | `LOCATION_URL`            | unset                          |
    /// | `LOCATION_TIMEOUT_SECS`   | `5`                            |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or a missing S3 bucket/region when the
    /// `s3` backend is selected. Misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let classifier_url = std::env::var("CLASSIFIER_URL")
            .unwrap_or_else(|_| "http://localhost:8500/classify".into());

        let classifier_timeout_secs: u64 = std::env::var("CLASSIFIER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("CLASSIFIER_TIMEOUT_SECS must be a valid u64");

        let storage = Self::storage_from_env();

        let location_url = std::env::var("LOCATION_URL").ok().filter(|s| !s.is_empty());

        let location_timeout_secs: u64 = std::env::var("LOCATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("LOCATION_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            classifier_url,
            classifier_timeout_secs,
            storage,
            location_url,
            location_timeout_secs,
        }
    }

    fn storage_from_env() -> StorageConfig {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());
        let public_base_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000/media".into());

        match backend.as_str() {
            "local" => StorageConfig::Local {
                base_dir: std::env::var("STORAGE_BASE_DIR").unwrap_or_else(|_| "./media".into()),
                public_base_url,
            },
            "s3" => StorageConfig::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set for the s3 storage backend"),
                region: std::env::var("S3_REGION")
                    .expect("S3_REGION must be set for the s3 storage backend"),
                public_base_url,
            },
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Must be one of: local, s3"),
        }
    }
}
