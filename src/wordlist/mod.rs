use std::collections::HashSet;

use thiserror::Error;

/// Built-in path list used when no wordlist file is given. Small on
/// purpose; serious scans bring their own list.
const EMBEDDED_PATHS: &str = "\
# dirfuzz default wordlist
.git/HEAD
.env
.htaccess
admin
admin/login
api
api/v1
app
assets
backup
backup.zip
bin
cgi-bin
config
config.php
console
dashboard
data
db
debug
dist
docs
download
favicon.ico
files
home
images
img
include
index.%EXT%
js
lib
log
login
logout
logs
media
old
panel
phpinfo.php
private
public
register
robots.txt
server-status
settings
setup
sitemap.xml
src
static
status
test
tmp
upload
uploads
user
users
vendor
web
wp-admin
wp-login.php
";

/// Built-in hostname list for vhost mode.
const EMBEDDED_VHOSTS: &str = "\
# dirfuzz default vhost wordlist
admin
api
app
beta
cdn
dev
files
ftp
git
internal
intranet
mail
portal
staging
stage
static
test
vpn
www
www2
";

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("reading wordlist {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the list of paths to fuzz. An empty path selects the embedded
/// default list. Lines are trimmed, `#` comments and blanks dropped, and
/// entries de-duplicated preserving order. `%EXT%` placeholders expand once
/// per extension (plus the bare entry); with `force_extensions`, every
/// plain entry additionally gets each extension appended.
pub fn load(path: &str, extensions: &[String], force_extensions: bool) -> Result<Vec<String>, WordlistError> {
    let raw = read_or_embedded(path, EMBEDDED_PATHS)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut result: Vec<String> = Vec::new();
    let mut add = |entry: String| {
        if !entry.is_empty() && seen.insert(entry.clone()) {
            result.push(entry);
        }
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains("%EXT%") {
            for ext in extensions {
                let ext = ext.trim_start_matches('.');
                add(line.replace("%EXT%", ext));
            }
            let bare = line.replace(".%EXT%", "").replace("%EXT%", "");
            add(bare);
        } else if force_extensions && !extensions.is_empty() {
            add(line.to_string());
            for ext in extensions {
                let ext = ext.trim_start_matches('.');
                add(format!("{line}.{ext}"));
            }
        } else {
            add(line.to_string());
        }
    }

    Ok(result)
}

/// Loads a plain wordlist (vhost hostnames): comments and blanks dropped,
/// de-duplicated, no placeholder processing. An empty path selects the
/// embedded hostname list.
pub fn load_simple(path: &str) -> Result<Vec<String>, WordlistError> {
    let raw = read_or_embedded(path, EMBEDDED_VHOSTS)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut result: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if seen.insert(line.to_string()) {
            result.push(line.to_string());
        }
    }
    Ok(result)
}

fn read_or_embedded(path: &str, embedded: &str) -> Result<String, WordlistError> {
    if path.is_empty() {
        return Ok(embedded.to_string());
    }
    std::fs::read_to_string(path).map_err(|source| WordlistError::Read {
        path: path.to_string(),
        source,
    })
}
