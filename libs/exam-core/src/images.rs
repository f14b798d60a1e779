//! Question-image pairing and content-addressed storage.

use std::cmp::Ordering;
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::types::Question;

/// Pair extracted image files with parsed questions.
///
/// Files are taken in natural order (the extraction tool numbers them
/// `<base>-1_1.png` through `<base>-10_1.png`, so numeric runs compare
/// by value) and the counts must agree exactly; pairing is never
/// guessed.
/// Each question receives the deterministic provisional name
/// `<file_id>-<index>.png`; the returned paths are aligned with the
/// question sequence for [`content_address`].
pub fn assign_images(
    questions: &mut [Question],
    file_id: &str,
    image_paths: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    if questions.len() != image_paths.len() {
        return Err(PipelineError::ImageCountMismatch {
            questions: questions.len(),
            images: image_paths.len(),
        });
    }
    let mut sorted = image_paths.to_vec();
    sorted.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    for (index, question) in questions.iter_mut().enumerate() {
        question.question_image = Some(format!("{}-{}.png", file_id, index + 1));
    }
    Ok(sorted)
}

/// Copy each paired image into `output_dir` under a content-addressed
/// name and rewrite the question's reference to it.
///
/// Identical images across documents or revisions collapse to the same
/// stored file. Whole-file reads are fine here; the images are small.
pub fn content_address(
    questions: &mut [Question],
    sources: &[PathBuf],
    output_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    for (question, source) in questions.iter_mut().zip(sources) {
        let bytes = fs::read(source)?;
        let name = content_name(&bytes);
        fs::write(output_dir.join(&name), &bytes)?;
        debug!(source = %source.display(), name, "stored question image");
        question.question_image = Some(name);
    }
    Ok(())
}

/// Content-addressed file name: the first 16 hex digits of the SHA-256
/// of the image bytes. Collisions are negligible at this corpus size.
pub fn content_name(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = format!("{:x}", hasher.finalize());
    format!("{}.png", &digest[..16])
}

/// Compare strings with embedded numbers by numeric value, so `-9_1`
/// orders before `-10_1`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut xs = a.chars().peekable();
    let mut ys = b.chars().peekable();
    loop {
        match (xs.peek().copied(), ys.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    match take_number(&mut xs).cmp(&take_number(&mut ys)) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                } else {
                    match x.cmp(&y) {
                        Ordering::Equal => {
                            xs.next();
                            ys.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> u64 {
    let mut value = 0u64;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
        chars.next();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn questions(count: usize) -> Vec<Question> {
        (1..=count)
            .map(|number| Question {
                question: format!("question {number}"),
                number: number as u32,
                ..Question::default()
            })
            .collect()
    }

    #[test]
    fn natural_order_compares_numeric_runs_by_value() {
        let mut names = vec!["base-10_1.png", "base-2_1.png", "base-9_1.png", "base-1_1.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["base-1_1.png", "base-2_1.png", "base-9_1.png", "base-10_1.png"]
        );
    }

    #[test]
    fn count_mismatch_is_fatal() {
        let mut qs = questions(3);
        let paths = vec![PathBuf::from("a.png")];
        let err = assign_images(&mut qs, "english-moto-signs-true", &paths).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ImageCountMismatch { questions: 3, images: 1 }
        ));
    }

    #[test]
    fn assignment_uses_deterministic_sequential_names() {
        let mut qs = questions(2);
        let paths = vec![PathBuf::from("x-2_1.png"), PathBuf::from("x-1_1.png")];
        let sorted = assign_images(&mut qs, "english-moto-signs-true", &paths).unwrap();
        assert_eq!(
            qs[0].question_image.as_deref(),
            Some("english-moto-signs-true-1.png")
        );
        assert_eq!(
            qs[1].question_image.as_deref(),
            Some("english-moto-signs-true-2.png")
        );
        assert_eq!(sorted, vec![PathBuf::from("x-1_1.png"), PathBuf::from("x-2_1.png")]);
    }

    #[test]
    fn content_names_are_stable_hash_prefixes() {
        let name = content_name(b"png bytes");
        assert_eq!(name.len(), 16 + ".png".len());
        assert_eq!(name, content_name(b"png bytes"));
        assert_ne!(name, content_name(b"other bytes"));
    }

    #[test]
    fn identical_images_collapse_to_one_stored_file() {
        let workdir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let first = workdir.path().join("x-1_1.png");
        let second = workdir.path().join("x-2_1.png");
        fs::write(&first, b"same bytes").unwrap();
        fs::write(&second, b"same bytes").unwrap();

        let mut qs = questions(2);
        content_address(&mut qs, &[first, second], out.path()).unwrap();

        assert_eq!(qs[0].question_image, qs[1].question_image);
        let stored: Vec<_> = fs::read_dir(out.path()).unwrap().collect();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn references_are_rewritten_to_content_names() {
        let workdir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = workdir.path().join("x-1_1.png");
        fs::write(&source, b"sign image").unwrap();

        let mut qs = questions(1);
        content_address(&mut qs, &[source], out.path()).unwrap();

        let name = qs[0].question_image.clone().unwrap();
        assert_eq!(name, content_name(b"sign image"));
        assert!(out.path().join(name).exists());
    }
}
