//! Gallery file naming: sanitization and collision suffixes.

use std::path::{Path, PathBuf};

/// Generate a lowercase, dash-friendly file name from a source path.
///
/// The stem is lowercased with spaces replaced by `-`; the extension is
/// lowercased. Nothing else is stripped, so sanitizing twice is a no-op.
pub fn sanitize_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase().replace(' ', "-"))
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}.{}", ext.to_string_lossy().to_lowercase()),
        None => stem,
    }
}

/// Pick a destination in `dir` for `name` that `is_taken` rejects.
///
/// Tries `name`, then `stem-1.ext`, `stem-2.ext`, ... and returns the first
/// candidate that is not taken.
pub fn resolve_collision(dir: &Path, name: &str, is_taken: impl Fn(&Path) -> bool) -> PathBuf {
    let first = dir.join(name);
    if !is_taken(&first) {
        return first;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u64..)
        .map(|n| dir.join(format!("{stem}-{n}{suffix}")))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sanitize_lowercases_and_dashes() {
        assert_eq!(sanitize_name(Path::new("/x/IMG 0042.JPG")), "img-0042.jpg");
        assert_eq!(sanitize_name(Path::new("Deck  Stain.Png")), "deck--stain.png");
        assert_eq!(sanitize_name(Path::new("café_(1).webp")), "café_(1).webp");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in ["IMG 0042.JPG", "A.JPG", "Mixed Case Name.JpEg", "no_ext", "a.b.C D.PNG"] {
            let once = sanitize_name(Path::new(raw));
            let twice = sanitize_name(Path::new(&once));
            assert_eq!(once, twice, "sanitizing {raw:?} twice changed it");
        }
    }

    #[test]
    fn test_sanitize_case_variants_collide() {
        assert_eq!(sanitize_name(Path::new("A.JPG")), sanitize_name(Path::new("a.jpg")));
    }

    #[test]
    fn test_resolve_free_name_is_unchanged() {
        let dest = resolve_collision(Path::new("/g/decks"), "a.jpg", |_| false);
        assert_eq!(dest, PathBuf::from("/g/decks/a.jpg"));
    }

    #[test]
    fn test_resolve_counts_up_from_one() {
        let dir = Path::new("/g/cabinetry");
        let mut taken: HashSet<PathBuf> = HashSet::new();

        for expected in ["a.jpg", "a-1.jpg", "a-2.jpg", "a-3.jpg"] {
            let dest = resolve_collision(dir, "a.jpg", |p| taken.contains(p));
            assert_eq!(dest, dir.join(expected));
            taken.insert(dest);
        }
    }

    #[test]
    fn test_resolve_skips_gaps_in_order() {
        let dir = Path::new("/g");
        let taken: HashSet<PathBuf> = ["x.png", "x-1.png", "x-3.png"]
            .iter()
            .map(|n| dir.join(n))
            .collect();
        assert_eq!(
            resolve_collision(dir, "x.png", |p| taken.contains(p)),
            dir.join("x-2.png")
        );
    }

    #[test]
    fn test_resolve_never_returns_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.webp"), b"old").unwrap();
        std::fs::write(dir.path().join("b-1.webp"), b"old").unwrap();

        let dest = resolve_collision(dir.path(), "b.webp", |p| p.exists());
        assert_eq!(dest, dir.path().join("b-2.webp"));
        assert!(!dest.exists());
    }
}
