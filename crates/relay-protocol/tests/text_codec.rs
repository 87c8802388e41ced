// crates/relay-protocol/tests/text_codec.rs
use relay_core::RoomId;
use relay_protocol::{
    format_broadcast, parse_broadcast, room_from_path, room_path, Broadcast, ProtocolError,
};

#[test]
fn broadcast_prefix_is_exact() {
    let room = RoomId::new("lobby").unwrap();
    assert_eq!(format_broadcast(&room, "hi"), "Message in lobby: hi");
    assert_eq!(format_broadcast(&room, ""), "Message in lobby: ");
}

#[test]
fn text_is_carried_verbatim() {
    let room = RoomId::new("Dev Room").unwrap();
    let line = format_broadcast(&room, "a: b\nc  ");
    assert_eq!(line, "Message in Dev Room: a: b\nc  ");
    assert_eq!(
        parse_broadcast(&line),
        Some(Broadcast { room: "Dev Room", text: "a: b\nc  " })
    );
}

#[test]
fn foreign_frames_are_not_broadcasts() {
    assert_eq!(parse_broadcast("hello"), None);
    assert_eq!(parse_broadcast("Message in lobby"), None);
    assert_eq!(parse_broadcast("Message in : text"), None);
}

#[test]
fn room_is_final_path_segment() {
    assert_eq!(room_from_path("/ws/lobby").unwrap().as_str(), "lobby");
    assert_eq!(room_from_path("lobby").unwrap().as_str(), "lobby");
    assert_eq!(room_from_path("team/Lobby").unwrap().as_str(), "Lobby");
    assert_eq!(room_from_path("/ws/lobby?since=1").unwrap().as_str(), "lobby");
}

#[test]
fn only_the_final_encoded_segment_is_decoded() {
    assert_eq!(room_from_path("/ws/a%2Fb").unwrap().as_str(), "a/b");
    assert_eq!(room_from_path("/ws/lobby%3Fx").unwrap().as_str(), "lobby?x");
    assert_eq!(room_from_path("/ws/Dev%20Room").unwrap().as_str(), "Dev Room");
    assert_ne!(room_from_path("/ws/a%2Fb").unwrap(), room_from_path("/ws/b").unwrap());
}

#[test]
fn undecodable_segment_is_rejected() {
    assert_eq!(room_from_path("/ws/%FF"), Err(ProtocolError::InvalidEncoding));
}

#[test]
fn empty_final_segment_is_rejected() {
    assert_eq!(room_from_path(""), Err(ProtocolError::EmptyRoom));
    assert_eq!(room_from_path("/ws/"), Err(ProtocolError::EmptyRoom));
    assert_eq!(room_from_path("lobby/"), Err(ProtocolError::EmptyRoom));
}

#[test]
fn room_path_round_trips_through_addressing() {
    let room = RoomId::new("r1").unwrap();
    let path = room_path(&room);
    assert_eq!(path, "/ws/r1");
    assert_eq!(room_from_path(&path).unwrap(), room);

    let awkward = RoomId::new("a/b?c d").unwrap();
    let path = room_path(&awkward);
    assert_eq!(path, "/ws/a%2Fb%3Fc%20d");
    assert_eq!(room_from_path(&path).unwrap(), awkward);
}
