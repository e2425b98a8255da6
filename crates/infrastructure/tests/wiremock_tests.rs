//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - OSS audio publishing against a mocked S3-compatible endpoint
//! - Speech adapter recognition and the inline synthesis fallback
//! - Generation adapter error mapping
//! - Configuration validation

use std::path::PathBuf;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use application::ApplicationError;
use application::ports::{AudioPublisherPort, GeneratorPort, SynthesizerPort, TranscriberPort};
use domain::{AudioFormat, AudioPayload, SynthesizedAudioRef};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infrastructure::{
    AppConfig, DashScopeInferenceAdapter, OssAudioPublisher, SpeechAdapter, StorageConfig,
    SynthesisAppConfig,
};

const MULTIMODAL_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";
const GENERATION_PATH: &str = "/api/v1/services/aigc/text-generation/generation";

fn wav_payload() -> AudioPayload {
    AudioPayload::new(b"RIFF\x24\0\0\0WAVEfmt ".to_vec(), AudioFormat::Wav).unwrap()
}

// ============================================================================
// OSS Publisher Tests
// ============================================================================

mod oss_publisher_tests {
    use super::*;

    fn storage_for(server: &MockServer) -> StorageConfig {
        StorageConfig {
            write_endpoint: Some(server.uri()),
            path_style: true,
            access_key_id: Some(SecretString::from("test-id")),
            access_key_secret: Some(SecretString::from("test-secret")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn publish_puts_object_and_returns_public_url() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path_regex(r"^/ai-lover-audio/audio/[0-9a-f]{32}\.wav$"))
            .and(header("content-type", "audio/wav"))
            .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"d41d8cd9\""))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = OssAudioPublisher::new(&storage_for(&server)).unwrap();
        let reference = publisher.publish(&wav_payload()).await.unwrap();

        assert!(reference.key.as_str().starts_with("audio/"));
        assert_eq!(
            reference.url,
            format!(
                "https://ai-lover-audio.oss-cn-shanghai.aliyuncs.com/{}",
                reference.key
            )
        );
    }

    #[tokio::test]
    async fn two_publishes_use_distinct_keys() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let publisher = OssAudioPublisher::new(&storage_for(&server)).unwrap();
        let a = publisher.publish(&wav_payload()).await.unwrap();
        let b = publisher.publish(&wav_payload()).await.unwrap();

        assert_ne!(a.key, b.key);
    }

    #[tokio::test]
    async fn rejected_upload_is_upload_failed() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("<Error><Code>AccessDenied</Code></Error>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let publisher = OssAudioPublisher::new(&storage_for(&server)).unwrap();
        let err = publisher.publish(&wav_payload()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_upload_failed() {
        let config = StorageConfig {
            write_endpoint: Some("http://127.0.0.1:1".to_string()),
            path_style: true,
            access_key_id: Some(SecretString::from("id")),
            access_key_secret: Some(SecretString::from("secret")),
            ..Default::default()
        };

        let publisher = OssAudioPublisher::new(&config).unwrap();
        let err = publisher.publish(&wav_payload()).await.unwrap_err();

        assert_eq!(err.kind(), "upload_failed");
    }
}

// ============================================================================
// Speech Adapter Tests
// ============================================================================

mod speech_adapter_tests {
    use super::*;

    fn speech_config(server: &MockServer) -> SpeechConfig {
        SpeechConfig {
            base_url: format!("{}/api/v1", server.uri()),
            timeout_ms: 5000,
            ..Default::default()
        }
    }

    fn synthesis_into(dir: &std::path::Path) -> SynthesisAppConfig {
        SynthesisAppConfig {
            fallback_file: dir.join("output.wav"),
            ..Default::default()
        }
    }

    fn adapter(server: &MockServer, synthesis: &SynthesisAppConfig) -> SpeechAdapter {
        SpeechAdapter::new(speech_config(server), SecretString::from("sk-test"), synthesis)
            .unwrap()
    }

    #[tokio::test]
    async fn transcribe_returns_trimmed_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"choices": [{"message": {"content": [{"text": " 你好 "}]}}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = adapter(&server, &SynthesisAppConfig::default());
        let text = adapter.transcribe("https://b/audio/x.wav").await.unwrap();

        assert_eq!(text, "你好");
    }

    #[tokio::test]
    async fn transcribe_upstream_500_is_recognition_failed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("InternalError"))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = adapter(&server, &SynthesisAppConfig::default());
        let err = adapter.transcribe("https://b/audio/x.wav").await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::RecognitionFailed {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn synthesize_passes_remote_url_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio": {"url": "https://example/tts.mp3"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let synthesis = synthesis_into(dir.path());
        let adapter = adapter(&server, &synthesis);
        let audio = adapter.synthesize("你好呀").await.unwrap();

        assert_eq!(
            audio,
            SynthesizedAudioRef::Remote {
                url: "https://example/tts.mp3".to_string()
            }
        );
        assert!(!synthesis.fallback_file.exists());
    }

    #[tokio::test]
    async fn synthesize_writes_inline_audio_to_fallback_file() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio": {"data": "UklGRgAAAABXQVZF"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let synthesis = synthesis_into(dir.path());
        let adapter = adapter(&server, &synthesis);
        let audio = adapter.synthesize("晚安").await.unwrap();

        assert_eq!(audio.as_str(), "/output.wav");
        assert_eq!(
            audio,
            SynthesizedAudioRef::Local {
                file_path: synthesis.fallback_file.clone(),
                public_path: "/output.wav".to_string(),
            }
        );
        let written = std::fs::read(&synthesis.fallback_file).unwrap();
        assert_eq!(written, b"RIFF\0\0\0\0WAVE");
    }

    #[tokio::test]
    async fn unwritable_fallback_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio": {"data": "UklGRg=="}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let synthesis = SynthesisAppConfig {
            fallback_file: blocker.join("output.wav"),
            ..Default::default()
        };

        let adapter = adapter(&server, &synthesis);
        let err = adapter.synthesize("晚安").await.unwrap_err();

        assert!(matches!(err, ApplicationError::SynthesisDecodeError(_)));
    }

    #[tokio::test]
    async fn synthesize_without_audio_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let adapter = adapter(&server, &SynthesisAppConfig::default());
        let err = adapter.synthesize("晚安").await.unwrap_err();

        assert_eq!(err.kind(), "synthesis_empty_result");
    }

    #[tokio::test]
    async fn configured_voice_overrides_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MULTIMODAL_PATH))
            .and(wiremock::matchers::body_partial_json(
                serde_json::json!({"input": {"voice": "Serena"}}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio": {"url": "https://example/serena.wav"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let synthesis = SynthesisAppConfig {
            voice: Some("Serena".to_string()),
            fallback_file: PathBuf::from("unused.wav"),
            ..Default::default()
        };
        let adapter = adapter(&server, &synthesis);

        assert!(adapter.synthesize("hi").await.is_ok());
    }
}

// ============================================================================
// Generation Adapter Tests
// ============================================================================

mod generation_adapter_tests {
    use super::*;

    fn adapter(server: &MockServer) -> DashScopeInferenceAdapter {
        let config = InferenceConfig {
            base_url: format!("{}/api/v1", server.uri()),
            system_prompt: "persona".to_string(),
            timeout_ms: 5000,
            ..Default::default()
        };
        DashScopeInferenceAdapter::new(config, SecretString::from("sk-test")).unwrap()
    }

    #[tokio::test]
    async fn generate_returns_reply_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATION_PATH))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "input": {"messages": [
                    {"role": "system", "content": "persona"},
                    {"role": "user", "content": "你好"}
                ]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"choices": [{"message": {"role": "assistant", "content": "你好呀~想我了吗"}}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = adapter(&server).generate("你好").await.unwrap();
        assert_eq!(reply, "你好呀~想我了吗");
    }

    #[tokio::test]
    async fn generate_upstream_error_is_generation_failed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATION_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(1)
            .mount(&server)
            .await;

        let err = adapter(&server).generate("你好").await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::GenerationFailed {
                status: Some(503),
                ..
            }
        ));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn config_from_toml_with_credentials_validates() {
        let config = AppConfig::from_toml_str(
            r#"
            [dashscope]
            api_key = "sk-from-file"

            [storage]
            access_key_id = "id"
            access_key_secret = "secret"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn mismatched_regions_surface_as_warning() {
        let config = AppConfig::from_toml_str(
            r#"
            [storage]
            public_base_url = "https://ai-lover-audio.oss-cn-beijing.aliyuncs.com"
            "#,
        )
        .unwrap();

        assert!(
            config
                .endpoint_warnings()
                .iter()
                .any(|w| w.code == "STORAGE_REGION_MISMATCH")
        );
    }
}
