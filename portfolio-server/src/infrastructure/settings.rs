use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub media: MediaSettings,
}

/// Digest Cloudinary expects for signed requests; set per product environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl std::str::FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(anyhow!(
                "unsupported signature algorithm {other:?}, expecting sha1 or sha256"
            )),
        }
    }
}

#[derive(Clone)]
pub struct MediaSettings {
    pub api_base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub max_upload_bytes: usize,
    pub signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for MediaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSettings")
            .field("api_base_url", &self.api_base_url)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;

        let media = MediaSettings::from_env()?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            media,
        })
    }
}

impl MediaSettings {
    fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("MEDIA_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string())
            .trim_end_matches('/')
            .to_string();
        let cloud_name =
            get_required("CLOUDINARY_CLOUD_NAME").context("CLOUDINARY_CLOUD_NAME is required")?;
        let api_key =
            get_required("CLOUDINARY_API_KEY").context("CLOUDINARY_API_KEY is required")?;
        let api_secret =
            get_required("CLOUDINARY_API_SECRET").context("CLOUDINARY_API_SECRET is required")?;
        let folder =
            std::env::var("MEDIA_FOLDER").unwrap_or_else(|_| "portfolio-uploads".to_string());
        let max_upload_bytes = parse_usize_env("MEDIA_MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?;
        let signature_algorithm = match std::env::var("MEDIA_SIGNATURE_ALGORITHM") {
            Ok(raw) => raw
                .parse()
                .context("Failed to parse MEDIA_SIGNATURE_ALGORITHM")?,
            Err(_) => SignatureAlgorithm::default(),
        };

        Ok(Self {
            api_base_url,
            cloud_name,
            api_key,
            api_secret,
            folder,
            max_upload_bytes,
            signature_algorithm,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u32>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
