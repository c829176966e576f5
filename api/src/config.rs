use clap::Parser;
use credence_common::{
    form::{DEFAULT_COMPANY_NAME, DEFAULT_ID_PREFIX},
    views::{ImageRef, LatLng, MapEmbed},
};
use std::{net::SocketAddr, path::{Path, PathBuf}, time::Duration};

use crate::render::RenderAssets;

#[derive(Clone, Debug, Parser)]
pub struct CredenceApiConfig {
    #[clap(
        short,
        long,
        env = "CREDENCE_API_BIND_ADDR",
        default_value = "0.0.0.0:4000"
    )]
    pub bind_addr: SocketAddr,

    /// Origin used in verification links, e.g. `https://techinstance.com`.
    #[clap(
        long,
        env = "CREDENCE_API_PUBLIC_URL",
        default_value = "http://localhost:4000"
    )]
    pub public_url: String,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    /// Bearer token required on admin routes. When unset, admin routes are
    /// open.
    #[clap(long, env = "CREDENCE_API_ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Start with the demo certificates already issued.
    #[clap(long, env = "CREDENCE_API_SEED_DEMO", default_value_t = false)]
    pub seed_demo: bool,

    #[clap(long, env = "CREDENCE_API_ID_PREFIX", default_value = DEFAULT_ID_PREFIX)]
    pub id_prefix: String,

    #[clap(long, env = "CREDENCE_API_COMPANY_NAME", default_value = DEFAULT_COMPANY_NAME)]
    pub company_name: String,

    #[clap(
        long,
        env = "CREDENCE_API_SIGNATORY_NAME",
        default_value = "Ajay Kumar Yadav"
    )]
    pub signatory_name: String,

    #[clap(
        long,
        env = "CREDENCE_API_SIGNATORY_POSITION",
        default_value = "Tech Instance Coordinator"
    )]
    pub signatory_position: String,

    /// Image file used as the company logo on certificates.
    #[clap(long, env = "CREDENCE_API_LOGO_FILE")]
    pub logo_file: Option<PathBuf>,

    /// Image file used as the signatory's signature on certificates.
    #[clap(long, env = "CREDENCE_API_SIGNATURE_FILE")]
    pub signature_file: Option<PathBuf>,

    /// Artificial latency before a verification lookup answers.
    #[clap(long, env = "CREDENCE_API_VERIFICATION_DELAY_MS", default_value_t = 0)]
    pub verification_delay_ms: u64,

    /// Browser key for the map provider.
    #[clap(long, env = "CREDENCE_API_MAPS_API_KEY")]
    pub maps_api_key: Option<String>,

    #[clap(long, env = "CREDENCE_API_MAP_LAT", default_value_t = 37.7749)]
    pub map_lat: f64,

    #[clap(long, env = "CREDENCE_API_MAP_LNG", default_value_t = -122.4194, allow_hyphen_values = true)]
    pub map_lng: f64,

    #[clap(long, env = "CREDENCE_API_MAP_ZOOM", default_value_t = 14)]
    pub map_zoom: u8,

    #[clap(
        long,
        env = "CREDENCE_API_MAP_MARKER_TITLE",
        default_value = "TechNex Headquarters"
    )]
    pub map_marker_title: String,
}

impl CredenceApiConfig {
    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    pub fn map_embed(&self) -> MapEmbed {
        MapEmbed {
            center: LatLng {
                lat: self.map_lat,
                lng: self.map_lng,
            },
            zoom: self.map_zoom,
            marker_title: self.map_marker_title.clone(),
            height: "400px".into(),
            api_key: self.maps_api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    /// Build the render assets, reading the logo and signature files if
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured image file can't be read.
    pub fn render_assets(&self) -> anyhow::Result<RenderAssets> {
        Ok(RenderAssets {
            company_logo: read_image(self.logo_file.as_deref())?,
            signature: read_image(self.signature_file.as_deref())?,
            signatory_name: self.signatory_name.clone(),
            signatory_position: self.signatory_position.clone(),
            verification_base: self.public_url.clone(),
            ..RenderAssets::default()
        })
    }
}

fn read_image(path: Option<&Path>) -> anyhow::Result<ImageRef> {
    let Some(path) = path else {
        return Ok(ImageRef::Absent);
    };

    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read image file {}: {}", path.display(), e))?;
    let mime = ImageRef::mime_for_extension(
        path.extension().and_then(|e| e.to_str()).unwrap_or_default(),
    );

    Ok(ImageRef::inline(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_site() {
        let config = CredenceApiConfig::parse_from(["credence-api"]);

        assert_eq!(config.id_prefix, "TECH");
        assert_eq!(config.company_name, "Tech Instance");
        assert_eq!(config.verification_delay(), Duration::ZERO);

        let map = config.map_embed();
        assert_eq!(map.center, LatLng { lat: 37.7749, lng: -122.4194 });
        assert_eq!(map.zoom, 14);
        assert_eq!(map.marker_title, "TechNex Headquarters");
    }

    #[test]
    fn blank_map_key_is_treated_as_absent() {
        let config = CredenceApiConfig::parse_from(["credence-api", "--maps-api-key", ""]);
        assert_eq!(config.map_embed().api_key, None);
    }

    #[test]
    fn missing_logo_file_is_an_error() {
        let config = CredenceApiConfig::parse_from([
            "credence-api",
            "--logo-file",
            "/definitely/not/here.png",
        ]);
        assert!(config.render_assets().is_err());
    }

    #[test]
    fn render_assets_use_public_url_for_links() {
        let config = CredenceApiConfig::parse_from([
            "credence-api",
            "--public-url",
            "https://techinstance.com",
        ]);
        let assets = config.render_assets().unwrap();

        assert_eq!(assets.verification_base, "https://techinstance.com");
        assert_eq!(assets.signatory_name, "Ajay Kumar Yadav");
        assert_eq!(assets.company_logo, ImageRef::Absent);
    }
}
