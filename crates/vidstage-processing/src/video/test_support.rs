use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script standing in for ffprobe or ffmpeg.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// ffmpeg stand-in that copies the `-i` input to the final argument.
pub(crate) const COPYING_FFMPEG: &str = r#"in=""
prev=""
for arg; do
  if [ "$prev" = "-i" ]; then in="$arg"; fi
  prev="$arg"
done
cp "$in" "$prev""#;
