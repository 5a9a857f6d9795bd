use anyhow::Result;
use gamap_core::model::OutputInfo;
use x11rb::connection::Connection;
use x11rb::protocol::randr::{self, ConnectionExt as RandrConnectionExt, GetOutputInfoReply};
use x11rb::rust_connection::RustConnection;

/// List the currently connected outputs, in the order the server reports
/// them. Fails if the X display cannot be reached.
pub fn list_outputs() -> Result<Vec<OutputInfo>> {
    let (conn, screen_num) = RustConnection::connect(None)?;
    let screen = &conn.setup().roots[screen_num];
    let window = screen.root;
    let _ver = conn.randr_query_version(1, 5)?.reply()?;
    let resources = conn.randr_get_screen_resources_current(window)?.reply()?;
    let mut outputs = Vec::new();
    for output in resources.outputs {
        let info: GetOutputInfoReply = conn
            .randr_get_output_info(output, resources.config_timestamp)?
            .reply()?;
        let name = String::from_utf8_lossy(&info.name).to_string();
        outputs.push((name, info.connection));
    }
    Ok(keep_connected(outputs))
}

/// Keep only outputs that report a connected state, preserving query order.
fn keep_connected(
    outputs: impl IntoIterator<Item = (String, randr::Connection)>,
) -> Vec<OutputInfo> {
    outputs
        .into_iter()
        .filter(|(_, state)| *state == randr::Connection::CONNECTED)
        .map(|(name, _)| OutputInfo { name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(outputs: Vec<OutputInfo>) -> Vec<String> {
        outputs.into_iter().map(|o| o.name).collect()
    }

    #[test]
    fn drops_disconnected_outputs() {
        let listed = keep_connected(vec![
            ("eDP-1".to_string(), randr::Connection::CONNECTED),
            ("DP-1".to_string(), randr::Connection::DISCONNECTED),
            ("HDMI-1".to_string(), randr::Connection::CONNECTED),
        ]);
        assert_eq!(names(listed), ["eDP-1", "HDMI-1"]);
    }

    #[test]
    fn preserves_query_order() {
        let listed = keep_connected(vec![
            ("HDMI-2".to_string(), randr::Connection::CONNECTED),
            ("eDP-1".to_string(), randr::Connection::CONNECTED),
            ("DP-3".to_string(), randr::Connection::CONNECTED),
        ]);
        assert_eq!(names(listed), ["HDMI-2", "eDP-1", "DP-3"]);
    }

    #[test]
    fn unknown_state_is_not_listed() {
        let listed = keep_connected(vec![
            ("eDP-1".to_string(), randr::Connection::CONNECTED),
            ("DP-1".to_string(), randr::Connection::UNKNOWN),
        ]);
        assert_eq!(names(listed), ["eDP-1"]);
    }

    #[test]
    fn empty_when_nothing_connected() {
        let listed = keep_connected(vec![
            ("DP-1".to_string(), randr::Connection::DISCONNECTED),
            ("DP-2".to_string(), randr::Connection::DISCONNECTED),
        ]);
        assert!(listed.is_empty());
    }
}
