//! Integration tests for ai_speech crate
//!
//! Exercises recognition and synthesis against a mocked DashScope API.

use std::time::Duration;

use ai_speech::{
    DashScopeSpeechProvider, SpeechConfig, SpeechError, SpeechToText, SynthesizedSpeech,
    TextToSpeech,
};
use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MULTIMODAL_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";
const AUDIO_URL: &str = "https://ai-lover-audio.oss-cn-shanghai.aliyuncs.com/audio/abc.wav";

/// Create a test configuration pointing to mock server
fn test_config(base_url: &str) -> SpeechConfig {
    SpeechConfig {
        base_url: format!("{base_url}/api/v1"),
        timeout_ms: 5000,
        ..Default::default()
    }
}

fn provider_for(server: &MockServer) -> DashScopeSpeechProvider {
    DashScopeSpeechProvider::new(test_config(&server.uri()), SecretString::from("test-api-key"))
        .expect("Failed to create provider")
}

fn asr_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "output": {
            "choices": [{
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": [{"text": text}],
                    "annotations": [{"type": "audio_info", "language": "zh", "emotion": "neutral"}]
                }
            }]
        },
        "request_id": "asr-1"
    })
}

// ============ STT (Recognition) Integration Tests ============

#[tokio::test]
async fn stt_recognition_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "qwen3-asr-flash",
            "input": {"messages": [
                {"role": "system", "content": [{"text": ""}]},
                {"role": "user", "content": [{"audio": AUDIO_URL}]}
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(asr_response(" 你好 ")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let transcription = provider.transcribe_url(AUDIO_URL).await.unwrap();

    assert_eq!(transcription.text, "你好");
    assert_eq!(transcription.language.as_deref(), Some("zh"));
    assert_eq!(transcription.emotion.as_deref(), Some("neutral"));
}

#[tokio::test]
async fn stt_sends_language_hint_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .and(body_partial_json(serde_json::json!({
            "parameters": {"asr_options": {"language": "zh", "enable_itn": false}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(asr_response("在吗")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = SpeechConfig {
        asr_language: Some("zh".to_string()),
        ..test_config(&mock_server.uri())
    };
    let provider = DashScopeSpeechProvider::new(config, SecretString::from("k")).unwrap();

    assert_eq!(provider.transcribe_url(AUDIO_URL).await.unwrap().text, "在吗");
}

#[tokio::test]
async fn stt_service_error_keeps_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"code":"InvalidParameter","message":"audio url unreachable"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.transcribe_url(AUDIO_URL).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("audio url unreachable"));
}

#[tokio::test]
async fn stt_missing_text_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": {"choices": [{"message": {"role": "assistant", "content": []}}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.transcribe_url(AUDIO_URL).await.unwrap_err();

    assert!(matches!(err, SpeechError::InvalidResponse(_)));
}

#[tokio::test]
async fn stt_rejects_empty_url_without_calling_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.transcribe_url("  ").await.unwrap_err();

    assert!(matches!(err, SpeechError::InvalidInput(_)));
}

#[tokio::test]
async fn stt_timeout_reports_configured_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(asr_response("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = SpeechConfig {
        timeout_ms: 100,
        ..test_config(&mock_server.uri())
    };
    let provider = DashScopeSpeechProvider::new(config, SecretString::from("k")).unwrap();
    let err = provider.transcribe_url(AUDIO_URL).await.unwrap_err();

    assert!(matches!(err, SpeechError::Timeout(100)));
}

// ============ TTS (Synthesis) Integration Tests ============

#[tokio::test]
async fn tts_returns_hosted_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "qwen-tts",
            "input": {"text": "你好呀~想我了吗", "voice": "Cherry"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": {"audio": {"url": "https://example/tts.mp3", "expires_at": 1_760_000_000}},
            "request_id": "tts-1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let speech = provider.synthesize("你好呀~想我了吗", None).await.unwrap();

    assert_eq!(speech, SynthesizedSpeech::Url("https://example/tts.mp3".to_string()));
}

#[tokio::test]
async fn tts_uses_requested_voice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .and(body_partial_json(serde_json::json!({"input": {"voice": "Ethan"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": {"audio": {"url": "https://example/ethan.wav"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let speech = provider.synthesize("hello", Some("Ethan")).await.unwrap();

    assert!(matches!(speech, SynthesizedSpeech::Url(_)));
}

#[tokio::test]
async fn tts_decodes_inline_audio() {
    let mock_server = MockServer::start().await;

    // "RIFF....WAVE" base64 encoded
    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": {"audio": {"data": "UklGRgAAAABXQVZF"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let speech = provider.synthesize("晚安", None).await.unwrap();

    assert_eq!(speech, SynthesizedSpeech::Inline(b"RIFF\0\0\0\0WAVE".to_vec()));
}

#[tokio::test]
async fn tts_without_audio_is_empty_synthesis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": {"audio": {}}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.synthesize("晚安", None).await.unwrap_err();

    assert!(matches!(err, SpeechError::EmptySynthesis(_)));
}

#[tokio::test]
async fn tts_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MULTIMODAL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("InternalError"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.synthesize("晚安", None).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[test]
fn provider_rejects_invalid_config() {
    let config = SpeechConfig {
        timeout_ms: 0,
        ..Default::default()
    };
    let err = DashScopeSpeechProvider::new(config, SecretString::from("k")).unwrap_err();
    assert!(matches!(err, SpeechError::Configuration(_)));
}
