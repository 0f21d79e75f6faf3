//! Socket path resolution for the preview channel.

use std::path::PathBuf;

/// File name of the sync socket inside the chosen directory.
const SOCKET_FILE_NAME: &str = "lumen-preview.sock";

/// Default socket path for the preview sync channel.
///
/// `LUMEN_PREVIEW_SOCKET` overrides the path wholesale. Otherwise the socket
/// lives in the user's runtime directory, falling back to the system temp
/// directory when no runtime directory is usable. Both primary and preview
/// process must resolve the same path, so keep overrides in sync across them.
#[must_use]
pub fn default_socket_path() -> PathBuf {
	resolve(std::env::var("LUMEN_PREVIEW_SOCKET").ok())
}

fn resolve(override_path: Option<String>) -> PathBuf {
	if let Some(path) = override_path {
		return PathBuf::from(path);
	}
	dirs::runtime_dir()
		.filter(|dir| std::fs::create_dir_all(dir).is_ok())
		.unwrap_or_else(std::env::temp_dir)
		.join(SOCKET_FILE_NAME)
}
