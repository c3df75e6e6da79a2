use complex_logistic_render::ResultBuffer;

const BOUNDED: char = '#';
const ESCAPED: char = '.';

/// Downsample `results` to at most `max_cols` columns of text.
///
/// Each character covers a block of samples, twice as tall as it is wide
/// to roughly match terminal cells. A block shows as bounded if any
/// sample in it is bounded. Row 0 of the output is the top of the region.
pub(crate) fn text_preview(results: &ResultBuffer, max_cols: u32) -> String {
    if results.width == 0 || results.height == 0 || max_cols == 0 {
        return String::new();
    }
    let step_x = results.width.div_ceil(max_cols).max(1);
    let step_y = step_x * 2;
    let cols = results.width.div_ceil(step_x);
    let rows = results.height.div_ceil(step_y);

    let mut out = String::with_capacity(((cols + 1) * rows) as usize);
    for r in 0..rows {
        let j0 = r * step_y;
        let j1 = (j0 + step_y).min(results.height);
        for c in 0..cols {
            let i0 = c * step_x;
            let i1 = (i0 + step_x).min(results.width);
            let any_bounded =
                (i0..i1).any(|i| (j0..j1).any(|j| !results.escaped(i, j)));
            out.push(if any_bounded { BOUNDED } else { ESCAPED });
        }
        out.push('\n');
    }
    out
}
