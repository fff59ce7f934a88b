use anyhow::Result;
use std::path::Path;

pub(crate) const DEFAULT_CONFIG: &str = r#"# GSA gateway configuration

[server]
host = "127.0.0.1"
port = 8080
# Origins allowed to call the API from a browser. Empty allows any.
allowed_origins = []

# System name -> appliance base address, without trailing slash.
# Searches go to <base>/search, suggestions to <base>/suggest and
# feeds to <base>:19900/xmlfeed.
[systems]
intranet = "http://gsa.example.com"

[search]
client = ""
results_per_page = 10
max_suggestions = 10

# Forward the caller's session cookie on secure searches.
# [auth_cookie]
# name = ".ASPXAUTH"
# http_only = true
# secure = false
# ttl_secs = 1200
"#;

/// Initialize a new config file
pub fn run_init(path: &Path) -> Result<()> {
    let path = shellexpand::tilde(&path.to_string_lossy()).to_string();
    let path = Path::new(&path);

    if path.exists() {
        anyhow::bail!("Config already exists at {:?}", path);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    println!("Created config at {:?}", path);
    Ok(())
}
