//! Decoding and encoding of [`SocketMessage`] frames.
//!
//! Decoding happens in two stages so that callers can tell a frame that is not
//! JSON at all apart from JSON that does not match any known message shape.
//! Both are protocol errors: the caller drops the frame and keeps the
//! connection open.

use thiserror::Error;

use super::message::SocketMessage;

/// Errors raised while decoding or encoding a frame
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame is not valid JSON
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The frame is JSON but does not match the message schema
    #[error("schema validation failed: {0}")]
    Schema(#[source] serde_json::Error),

    /// The message could not be serialized
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Parse and validate a text frame
pub fn decode(raw: &str) -> Result<SocketMessage, CodecError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(CodecError::Malformed)?;
    serde_json::from_value(value).map_err(CodecError::Schema)
}

/// Serialize a message into a text frame
pub fn encode(message: &SocketMessage) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(CodecError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        message::{ConnectPayload, MessageKind},
        shape::{CircleShape, Shape},
    };
    use serde_json::json;

    fn circle(id: &str) -> Shape {
        Shape::Circle(CircleShape {
            id: id.to_string(),
            x: 5.0,
            y: 5.0,
            stroke_color: "default".to_string(),
            fill_color: "default".to_string(),
            radius: 10.0,
        })
    }

    #[test]
    fn test_decode_connect_without_id() {
        // テスト項目: id を省略した CONNECT が解釈できる
        // given (前提条件):
        let raw = r##"{"type":"CONNECT","payload":{"displayName":"Alice","roomId":"lobby","cursorColor":"#3b82f6","currentTool":"pen"}}"##;

        // when (操作):
        let message = decode(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            SocketMessage::Connect(ConnectPayload {
                id: None,
                display_name: "Alice".to_string(),
                room_id: "lobby".to_string(),
                cursor_color: "#3b82f6".to_string(),
                current_tool: "pen".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_add_shape() {
        // テスト項目: ADD_SHAPE が図形ペイロード付きで解釈できる
        // given (前提条件):
        let raw = json!({
            "type": "ADD_SHAPE",
            "payload": {
                "id": "s1", "type": "circle", "x": 5, "y": 5, "radius": 10,
                "strokeColor": "default", "fillColor": "default"
            }
        })
        .to_string();

        // when (操作):
        let message = decode(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(message, SocketMessage::AddShape(circle("s1")));
        assert_eq!(message.kind(), MessageKind::AddShape);
    }

    #[test]
    fn test_decode_clear_canvas_without_payload() {
        // テスト項目: ペイロードを持たない CLEAR_CANVAS が解釈できる
        let message = decode(r#"{"type":"CLEAR_CANVAS"}"#).unwrap();

        assert_eq!(message, SocketMessage::ClearCanvas);
    }

    #[test]
    fn test_encode_clear_canvas_has_no_payload() {
        // テスト項目: CLEAR_CANVAS のエンコード結果に payload が含まれない
        let encoded = encode(&SocketMessage::ClearCanvas).unwrap();

        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value, json!({"type": "CLEAR_CANVAS"}));
    }

    #[test]
    fn test_decode_malformed_json() {
        // テスト項目: JSON として不正なフレームは Malformed エラーになる
        let result = decode("{not json");

        assert!(matches!(result, Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_decode_unknown_type_is_schema_error() {
        // テスト項目: 未知の type は Schema エラーになる
        let result = decode(r#"{"type":"SHOUT","payload":"hi"}"#);

        assert!(matches!(result, Err(CodecError::Schema(_))));
    }

    #[test]
    fn test_decode_wrong_payload_shape_is_schema_error() {
        // テスト項目: ペイロードの型が合わない場合は Schema エラーになる
        // given (前提条件): x が文字列
        let raw = json!({
            "type": "UPDATE_SHAPE",
            "payload": {
                "id": "s1", "type": "circle", "x": "5", "y": 5, "radius": 10,
                "strokeColor": "default", "fillColor": "default"
            }
        })
        .to_string();

        // when (操作):
        let result = decode(&raw);

        // then (期待する結果):
        assert!(matches!(result, Err(CodecError::Schema(_))));
    }

    #[test]
    fn test_decode_missing_payload_is_schema_error() {
        // テスト項目: payload が必須のメッセージで payload が無い場合は Schema エラーになる
        let result = decode(r#"{"type":"USER_LEFT"}"#);

        assert!(matches!(result, Err(CodecError::Schema(_))));
    }

    #[test]
    fn test_encode_strips_unknown_fields() {
        // テスト項目: 未知のフィールドはデコード時に捨てられ、再エンコードに含まれない
        // given (前提条件):
        let raw = r#"{"type":"USER_LEFT","payload":{"id":"u2","extra":true},"note":"x"}"#;

        // when (操作):
        let encoded = encode(&decode(raw).unwrap()).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value, json!({"type": "USER_LEFT", "payload": {"id": "u2"}}));
    }

    #[test]
    fn test_encode_writes_coordinates_as_floats() {
        // テスト項目: 整数で送られた座標は同じ値の浮動小数点数として再エンコードされる
        // given (前提条件):
        let raw = r#"{"type":"ADD_SHAPE","payload":{"id":"s1","type":"circle","x":5,"y":5,"strokeColor":"default","fillColor":"default","radius":10}}"#;

        // when (操作):
        let encoded = encode(&decode(raw).unwrap()).unwrap();

        // then (期待する結果):
        assert!(encoded.contains(r#""x":5.0"#));
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["payload"]["x"].as_f64(), Some(5.0));
        assert_eq!(value["payload"]["radius"].as_f64(), Some(10.0));
    }

    #[test]
    fn test_directionality_of_kinds() {
        // テスト項目: サーバー専用のメッセージ種別はクライアント発信として扱われない
        assert!(MessageKind::Connect.is_client_originated());
        assert!(MessageKind::AddShape.is_client_originated());
        assert!(!MessageKind::InitialState.is_client_originated());
        assert!(!MessageKind::UserJoined.is_client_originated());
        assert!(!MessageKind::UserLeft.is_client_originated());
    }
}
