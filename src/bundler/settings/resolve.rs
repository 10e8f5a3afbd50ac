//! Merges caller options with metadata-derived defaults.

use super::{DESCRIPTION_WIDTH, PackageOptions, UserOptions, host_arch, rpm_arch, wrap};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Package name used when neither the caller nor `package.json` provide one.
pub const DEFAULT_NAME: &str = "electron";

/// Version used when neither the caller nor `package.json` provide one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Release number used when neither the caller nor `package.json` provide one.
pub const DEFAULT_REVISION: &str = "1";

/// License used when neither the caller nor `package.json` provide one.
pub const DEFAULT_LICENSE: &str = "unknown";

/// Runtime dependencies of an Electron application on RPM-based distributions.
pub const DEFAULT_REQUIRES: &[&str] = &["lsb", "libXScrnSaver"];

/// Desktop menu categories.
pub const DEFAULT_CATEGORIES: &[&str] = &["GNOME", "GTK", "Utility"];

/// Resolves the final [`PackageOptions`].
///
/// Precedence for every field is: explicit caller option, then the value from
/// `package.json`, then a hardcoded fallback. Never fails; an empty metadata
/// map simply yields the fallbacks.
pub fn resolve(user: UserOptions, pkg: &Map<String, Value>) -> PackageOptions {
    let name = user
        .name
        .or_else(|| meta_str(pkg, "name"))
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let product_name = user
        .product_name
        .or_else(|| meta_str(pkg, "productName"))
        .unwrap_or_else(|| name.clone());

    let generic_name = user
        .generic_name
        .or_else(|| meta_str(pkg, "genericName"))
        .unwrap_or_else(|| product_name.clone());

    let description = user
        .description
        .or_else(|| meta_str(pkg, "description"))
        .unwrap_or_default();

    let product_description = user
        .product_description
        .or_else(|| meta_str(pkg, "productDescription"))
        .unwrap_or_else(|| description.clone());
    let product_description = wrap(&product_description, DESCRIPTION_WIDTH);

    let homepage = user
        .homepage
        .or_else(|| meta_str(pkg, "homepage"))
        .or_else(|| pkg.get("author").and_then(author_url))
        .unwrap_or_default();

    let license = user
        .license
        .or_else(|| meta_license(pkg))
        .unwrap_or_else(|| DEFAULT_LICENSE.to_string());

    let src = user.src.unwrap_or_default();
    let icon = user.icon.or_else(|| {
        let candidate = src.join("resources").join("app").join("icon.png");
        candidate.is_file().then_some(candidate)
    });

    PackageOptions {
        bin: user.bin.unwrap_or_else(|| name.clone()),
        version: user
            .version
            .or_else(|| meta_str(pkg, "version"))
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        revision: user
            .revision
            .or_else(|| meta_str(pkg, "revision"))
            .unwrap_or_else(|| DEFAULT_REVISION.to_string()),
        arch: user.arch.as_deref().map(rpm_arch).unwrap_or_else(host_arch),
        requires: user
            .requires
            .unwrap_or_else(|| DEFAULT_REQUIRES.iter().map(|s| s.to_string()).collect()),
        categories: user
            .categories
            .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()),
        dest: user.dest.unwrap_or_default(),
        rename: user.rename.unwrap_or_default(),
        rpmbuild: user.rpmbuild.unwrap_or_else(|| PathBuf::from("rpmbuild")),
        spec_template: user.spec_template,
        desktop_template: user.desktop_template,
        name,
        product_name,
        generic_name,
        description,
        product_description,
        license,
        homepage,
        icon,
        src,
    }
}

fn meta_str(pkg: &Map<String, Value>, key: &str) -> Option<String> {
    pkg.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

/// `license` is either an SPDX string or a legacy `{ "type": ... }` object.
fn meta_license(pkg: &Map<String, Value>) -> Option<String> {
    match pkg.get("license")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => obj.get("type").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

/// Extracts a homepage from an `author` field.
///
/// Objects use their `url` key. Strings follow the `Name <email> (url)`
/// convention: the parenthesized part wins, then an angle-bracketed part that
/// is an http(s) URL, then the whole string if it is a URL.
fn author_url(author: &Value) -> Option<String> {
    match author {
        Value::Object(obj) => obj
            .get("url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
        Value::String(s) => {
            let parenthesized = between(s, '(', ')').filter(|u| is_web_url(u));
            let angled = between(s, '<', '>').filter(|u| is_web_url(u));
            parenthesized
                .or(angled)
                .or_else(|| is_web_url(s.trim()).then_some(s.trim()))
                .map(String::from)
        }
        _ => None,
    }
}

fn between(s: &str, open: char, close: char) -> Option<&str> {
    let start = s.find(open)? + open.len_utf8();
    let end = start + s[start..].find(close)?;
    Some(s[start..end].trim())
}

fn is_web_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
