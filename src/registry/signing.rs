//! Signature Version 4 request signing

use crate::registry::credentials::Credentials;
use crate::registry::transport::SignedRequest;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const LONG_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const SHORT_DATE_FORMAT: &str = "%Y%m%d";

/// Sign `request` in place, adding `host`, `x-amz-date`,
/// `x-amz-security-token` (for session credentials) and `authorization`.
pub fn sign_request(
    request: &mut SignedRequest,
    credentials: &Credentials,
    region: &str,
    service: &str,
    time: DateTime<Utc>,
) {
    let amz_date = time.format(LONG_DATE_FORMAT).to_string();
    let short_date = time.format(SHORT_DATE_FORMAT).to_string();

    request.headers.remove("authorization");
    if !request.headers.contains_key("host") {
        let host = request.host();
        request.set_header("host", host);
    }
    request.set_header("x-amz-date", amz_date.clone());
    match credentials.session_token() {
        Some(token) => request.set_header("x-amz-security-token", token),
        None => {
            request.headers.remove("x-amz-security-token");
        }
    }

    let (canonical, signed_headers) = canonical_request(request);
    let scope = format!("{}/{}/{}/aws4_request", short_date, region, service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical.as_bytes()))
    );

    let key = signing_key(credentials.secret_access_key(), &short_date, region, service);
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

    request.set_header(
        "authorization",
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            credentials.access_key_id(),
            scope,
            signed_headers,
            signature
        ),
    );
}

/// Canonical request text and the `;`-joined signed header list
pub fn canonical_request(request: &SignedRequest) -> (String, String) {
    let mut canonical_headers = String::new();
    let mut names = Vec::with_capacity(request.headers.len());
    // BTreeMap keeps lower-cased names sorted
    for (name, value) in &request.headers {
        if name == "authorization" {
            continue;
        }
        canonical_headers.push_str(name);
        canonical_headers.push(':');
        canonical_headers.push_str(&canonical_header_value(value));
        canonical_headers.push('\n');
        names.push(name.as_str());
    }
    let signed_headers = names.join(";");

    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        canonical_uri(&request.path),
        canonical_query(request),
        canonical_headers,
        signed_headers,
        hex::encode(Sha256::digest(&request.payload))
    );

    (canonical, signed_headers)
}

/// `kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
pub fn signing_key(secret: &str, short_date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), short_date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn canonical_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    uri_encode(path, false)
}

fn canonical_query(request: &SignedRequest) -> String {
    let mut pairs: Vec<(String, String)> = request
        .query
        .iter()
        .map(|(k, v)| (uri_encode(k, true), uri_encode(v, true)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 encoding of everything but unreserved characters
fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b'/' if !encode_slash => encoded.push('/'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
