use crate::error::{Error, Result};

/// Nearest-neighbor resample of a packed RGB image into `dest`.
///
/// Destination pixel `(x, y)` takes source pixel
/// `(x * source_w / dest_w, y * source_h / dest_h)`.
pub fn resample_nearest(
    source: &[u8],
    source_w: usize,
    source_h: usize,
    dest: &mut [u8],
    dest_w: usize,
    dest_h: usize,
) -> Result<()> {
    if source_w == 0 || source_h == 0 {
        return Err(Error::SizeMismatch {
            what: "source image",
            expected: 1,
            actual: 0,
        });
    }
    let expected_source = source_w.saturating_mul(source_h).saturating_mul(3);
    if source.len() != expected_source {
        return Err(Error::SizeMismatch {
            what: "source image",
            expected: expected_source,
            actual: source.len(),
        });
    }
    let expected_dest = dest_w.saturating_mul(dest_h).saturating_mul(3);
    if dest.len() != expected_dest {
        return Err(Error::SizeMismatch {
            what: "destination surface",
            expected: expected_dest,
            actual: dest.len(),
        });
    }
    if dest.is_empty() {
        return Ok(());
    }

    for (y, dest_row) in dest.chunks_exact_mut(dest_w * 3).enumerate() {
        let source_y = y * source_h / dest_h;
        let source_row = &source[source_y * source_w * 3..(source_y + 1) * source_w * 3];
        for (x, px) in dest_row.chunks_exact_mut(3).enumerate() {
            let source_x = x * source_w / dest_w;
            px.copy_from_slice(&source_row[source_x * 3..source_x * 3 + 3]);
        }
    }
    Ok(())
}
