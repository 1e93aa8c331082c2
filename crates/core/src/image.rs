//! Images whose file names carry classes, e.g. `![](img/logo..right.small..png)`.

use crate::buffer::LineBuffer;
use crate::patterns;
use crate::types::ClassList;

/// Wrap the image line at `index` in bracket classes taken from its path.
///
/// The image line itself is kept as is, between the openers and closers.
/// Returns the classes used, or `None` if the line is not a classed image.
pub fn annotate_image(buffer: &mut LineBuffer, index: usize) -> Option<ClassList> {
    let line = buffer.get(index)?;
    let classes = ClassList::from_names(patterns::image_classes(line)?);

    let replacement = vec![
        classes.opening_line(),
        line.to_string(),
        classes.closing_line(),
    ];

    log::debug!("Image at line {}: {} class(es)", index + 1, classes.len());

    buffer.replace_line(index, replacement);
    Some(classes)
}
