use url::Url;

pub const VERIFY_PATH: &str = "verify";

/// `<base>/verify?id=<id>`, with the id percent-encoded.
///
/// Any path on `base` is kept, so the verifier can live under a prefix.
pub fn verification_url(base: &str, certificate_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    let path = format!("{}/{}", url.path().trim_end_matches('/'), VERIFY_PATH);
    url.set_path(&path);
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("id", certificate_id);
    Ok(url)
}

/// The certificate id carried by a verification URL, as a scanner reading
/// the QR code would recover it.
pub fn certificate_id_from_url(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
}
