//! Prompt construction from validated input.

use super::types::{ChatMessage, ChatRequest, ContentPart, ImageUrl, MessageContent};
use crate::input::InputSelection;
use crate::prompts;
use base64::Engine as _;

/// Every uploaded image is labeled PNG in the data URI, whatever its real encoding.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub fn image_data_uri(bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("{}{}", IMAGE_DATA_URI_PREFIX, encoded)
}

/// Builds the chat messages for one solve request. Pure; performs no I/O.
pub fn build(selection: &InputSelection) -> ChatRequest {
    match selection {
        InputSelection::Text(question) => ChatRequest::new(vec![
            ChatMessage::system(prompts::TEXT_SYSTEM),
            ChatMessage::user(MessageContent::Text(question.clone())),
        ]),
        InputSelection::Image(image) => ChatRequest::new(vec![
            ChatMessage::system(prompts::IMAGE_SYSTEM),
            ChatMessage::user(MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompts::IMAGE_USER.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_uri(&image.bytes),
                    },
                },
            ])),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::Role;
    use crate::input::UploadedImage;
    use pretty_assertions::assert_eq;

    fn decode_image_part(request: &ChatRequest) -> Vec<u8> {
        let parts = match &request.messages()[1].content {
            MessageContent::Parts(parts) => parts,
            other => panic!("expected parts, got {:?}", other),
        };
        let url = match &parts[1] {
            ContentPart::ImageUrl { image_url } => &image_url.url,
            other => panic!("expected image part, got {:?}", other),
        };
        let encoded = url
            .strip_prefix(IMAGE_DATA_URI_PREFIX)
            .expect("data URI prefix");
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap()
    }

    fn image_selection(bytes: Vec<u8>) -> InputSelection {
        InputSelection::Image(UploadedImage::new(bytes, Some("q.jpg".to_string())))
    }

    #[test]
    fn test_build_text_request() {
        let request = build(&InputSelection::Text("What is 2+2?".to_string()));

        assert_eq!(
            request.messages(),
            &[
                ChatMessage::system(prompts::TEXT_SYSTEM),
                ChatMessage::user(MessageContent::Text("What is 2+2?".to_string())),
            ]
        );
    }

    #[test]
    fn test_build_text_request_does_not_escape_question() {
        let question = "  <b>\"quoted\"</b> & 3 > 2\n";
        let request = build(&InputSelection::Text(question.to_string()));
        assert_eq!(
            request.messages()[1].content,
            MessageContent::Text(question.to_string())
        );
    }

    #[test]
    fn test_build_image_request_parts_in_order() {
        let request = build(&image_selection(vec![0xFF, 0xD8, 0xFF, 0xE0]));

        assert_eq!(request.messages().len(), 2);
        assert_eq!(
            request.messages()[0],
            ChatMessage::system(prompts::IMAGE_SYSTEM)
        );
        assert_eq!(request.messages()[1].role, Role::User);

        match &request.messages()[1].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(
                    parts[0],
                    ContentPart::Text {
                        text: prompts::IMAGE_USER.to_string()
                    }
                );
                assert!(matches!(parts[1], ContentPart::ImageUrl { .. }));
            }
            other => panic!("expected parts, got {:?}", other),
        }
    }

    #[test]
    fn test_jpeg_upload_is_still_labeled_png() {
        let request = build(&image_selection(vec![0xFF, 0xD8, 0xFF, 0xE0]));
        let json = serde_json::to_string(request.messages()).unwrap();
        assert!(json.contains("data:image/png;base64,"));
        assert!(!json.contains("image/jpeg"));
    }

    #[test]
    fn test_image_bytes_survive_data_uri() {
        let large: Vec<u8> = (0..=255u8).cycle().take(256 * 1024 + 7).collect();
        for bytes in [vec![], vec![0x00], vec![0x89, 0x50, 0x4E, 0x47], large] {
            let request = build(&image_selection(bytes.clone()));
            assert_eq!(decode_image_part(&request), bytes);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let selection = image_selection(vec![1, 2, 3, 4]);
        assert_eq!(build(&selection), build(&selection));
    }
}
