use crate::options::Messages;
use crate::state::Mode;

/// Status line for the current interaction.
pub fn derive_label(
    mode: Option<Mode>,
    is_drawing: bool,
    is_hovering_over_vertex: bool,
    polygon_clicks: u32,
    messages: &Messages,
) -> Option<String> {
    if !is_drawing {
        return messages.empty.clone();
    }
    let text = match mode {
        Some(Mode::Polygon) if is_hovering_over_vertex && polygon_clicks > 2 => &messages.close,
        Some(Mode::Polygon) => match polygon_clicks {
            0 => &messages.start,
            1 | 2 => return messages.empty.clone(),
            _ => &messages.close,
        },
        Some(Mode::Rectangle) => &messages.rectangle,
        Some(Mode::Circle) => &messages.circle,
        Some(Mode::Edit) => &messages.edit,
        Some(Mode::Delete) => &messages.delete,
        None => return messages.empty.clone(),
    };
    Some(text.clone())
}
