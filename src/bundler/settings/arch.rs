//! CPU architecture naming for RPM targets.

/// Translates an architecture name into RPM naming.
///
/// Accepts Node.js (`x64`, `ia32`, `arm64`, `armv7l`) and Rust
/// (`x86`, `aarch64`, `arm`) spellings. Names rpmbuild already understands
/// (`x86_64`, `noarch`, `ppc64le`, ...) pass through unchanged.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_redhat::bundler::settings::rpm_arch;
///
/// assert_eq!(rpm_arch("x64"), "x86_64");
/// assert_eq!(rpm_arch("noarch"), "noarch");
/// ```
pub fn rpm_arch(arch: &str) -> String {
    match arch {
        "x64" | "amd64" => "x86_64",
        "ia32" | "x86" | "i686" => "i386",
        "arm64" => "aarch64",
        "arm" | "armv7l" | "armhf" => "armv7hl",
        other => other,
    }
    .to_string()
}

/// Returns the host architecture in RPM naming.
pub fn host_arch() -> String {
    rpm_arch(std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_node_and_rust_names() {
        assert_eq!(rpm_arch("ia32"), "i386");
        assert_eq!(rpm_arch("x86"), "i386");
        assert_eq!(rpm_arch("arm64"), "aarch64");
        assert_eq!(rpm_arch("aarch64"), "aarch64");
        assert_eq!(rpm_arch("armv7l"), "armv7hl");
    }

    #[test]
    fn host_arch_is_never_node_style() {
        let arch = host_arch();
        assert_ne!(arch, "x64");
        assert!(!arch.is_empty());
    }
}
