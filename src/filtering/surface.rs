//! Surface-level noise filter.
//!
//! Drops contact details and web debris that survive text extraction
//! (`tel`, `www`, domains, emails), numbers, lone symbols, single characters
//! and plain English words. Common economic abbreviations are kept.
use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::tagger::Token;

use super::Filter;

lazy_static! {
    static ref STOP_SURFACES: HashSet<&'static str> = [
        "tel", "fax", "mail", "email", "e-mail", "http", "https", "www", "bok", "or", "kr",
        "co", "com", "net", "org",
    ]
    .into_iter()
    .collect();
    static ref KEPT_ABBREVIATIONS: HashSet<&'static str> =
        ["imf", "gdp", "cpi", "ppi", "kospi", "cds", "bp", "fed", "ecb"]
            .into_iter()
            .collect();
}

const DOMAIN_SUFFIXES: [&str; 7] = ["kr", "com", "net", "org", "co", "io", "ai"];

#[derive(Debug, Default, Clone, Copy)]
pub struct SurfaceFilter;

impl SurfaceFilter {
    /// Keep tokens whose surface passes the filter, preserving order.
    pub fn retain(&self, tokens: &mut Vec<Token>) {
        tokens.retain(|token| self.detect(token.surface()));
    }

    fn is_web_fragment(low: &str) -> bool {
        if low.starts_with("http://") || low.starts_with("https://") || low.starts_with("www.") {
            return true;
        }
        if low.contains('@') {
            return true;
        }
        match low.rsplit_once('.') {
            Some((host, suffix)) => !host.is_empty() && DOMAIN_SUFFIXES.contains(&suffix),
            None => false,
        }
    }

    fn is_number(s: &str) -> bool {
        let (int, frac) = match s.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (s, None),
        };
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        digits(int) && frac.map_or(true, digits)
    }
}

impl Filter<&str> for SurfaceFilter {
    fn detect(&self, surface: &str) -> bool {
        let s = surface.trim();
        if s.is_empty() {
            return false;
        }
        let low = s.to_lowercase();

        if STOP_SURFACES.contains(low.as_str()) || Self::is_web_fragment(&low) {
            return false;
        }
        if Self::is_number(s) || s.chars().all(|c| !c.is_alphanumeric()) {
            return false;
        }
        if s.chars().count() <= 1 {
            return false;
        }

        // plain english words
        let english = low.bytes().all(|b| b.is_ascii_lowercase());
        !(english && !KEPT_ABBREVIATIONS.contains(low.as_str()))
    }
}
