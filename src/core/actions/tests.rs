//! Workflow tests with a scripted probe and a recording host.

use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use super::*;
use crate::core::config::{EnvOverrides, FileConfig, resolve};
use crate::core::probe::fake::FakeProbe;

const TAGS: &str = r#"{"models":[{"name":"llama3.2:latest","size":4000000000,"details":{"parameter_size":"3.2B"}},{"name":"phi3:mini"}]}"#;

/// Records everything the workflows ask of the host. Picks by label.
#[derive(Default)]
struct FakeHost {
    pick: Option<String>,
    fail_launch: bool,
    notices: Vec<Notice>,
    menus: Vec<(String, Vec<String>)>,
    launched: Vec<LaunchRequest>,
}

impl FakeHost {
    fn picking(label: &str) -> Self {
        Self {
            pick: Some(label.to_string()),
            ..Default::default()
        }
    }
}

impl Host for FakeHost {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn choose(&mut self, title: &str, labels: &[String]) -> Option<usize> {
        self.menus.push((title.to_string(), labels.to_vec()));
        let pick = self.pick.as_deref()?;
        labels.iter().position(|l| l == pick)
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<(), LaunchError> {
        if self.fail_launch {
            return Err(LaunchError::Exit {
                program: "tmux".to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        self.launched.push(request.clone());
        Ok(())
    }
}

fn config(json: &str) -> ResolvedConfig {
    let file: FileConfig = serde_json::from_str(json).expect("valid test config");
    resolve(file, &EnvOverrides::default()).expect("valid")
}

fn sessions_config(dir: &Path) -> ResolvedConfig {
    config(&format!(
        r#"{{"executable":"/usr/bin/ollama","features":{{"save_sessions":true}},"session_dir":"{}"}}"#,
        dir.display()
    ))
}

fn now() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

#[test]
fn selector_with_server_down_notifies_and_does_not_launch() {
    let cfg = config("{}");
    let mut cache = StatusCache::from_config(FakeProbe::down(), &cfg);
    let mut host = FakeHost::picking("anything");

    let outcome = select_model(&mut cache, &cfg, &mut host, now());

    assert_eq!(outcome, ActionOutcome::Notified(Notice::NoModels));
    assert_eq!(host.notices, vec![Notice::NoModels]);
    assert!(host.menus.is_empty());
    assert!(host.launched.is_empty());
}

#[test]
fn selector_labels_include_known_details() {
    let cfg = config(r#"{"executable":"/usr/bin/ollama"}"#);
    let mut cache = StatusCache::from_config(FakeProbe::up(TAGS, ""), &cfg);
    let mut host = FakeHost::default();

    let outcome = select_model(&mut cache, &cfg, &mut host, now());

    assert_eq!(outcome, ActionOutcome::Cancelled);
    assert_eq!(host.menus.len(), 1);
    assert_eq!(
        host.menus[0].1,
        vec!["llama3.2:latest (3.2B, 3.7GB)".to_string(), "phi3:mini".to_string()]
    );
    assert!(host.launched.is_empty());
}

#[test]
fn selector_launches_chosen_model_verbatim() {
    let cfg = config(r#"{"executable":"/usr/bin/ollama"}"#);
    let mut cache = StatusCache::from_config(FakeProbe::up(TAGS, ""), &cfg);
    let mut host = FakeHost::picking("phi3:mini");

    let outcome = select_model(&mut cache, &cfg, &mut host, now());

    assert_eq!(outcome, ActionOutcome::Launched("phi3:mini".to_string()));
    assert_eq!(
        host.launched,
        vec![LaunchRequest::new("/usr/bin/ollama", "phi3:mini")]
    );
}

#[test]
fn quick_chat_with_default_model_skips_selection() {
    let cfg = config(r#"{"executable":"/usr/bin/ollama","default_model":"llama3.2"}"#);
    let mut cache = StatusCache::from_config(FakeProbe::up(TAGS, ""), &cfg);
    let mut host = FakeHost::default();

    let outcome = quick_chat(&mut cache, &cfg, &mut host, now());

    assert_eq!(outcome, ActionOutcome::Launched("llama3.2".to_string()));
    assert!(host.menus.is_empty());
    assert_eq!(cache.probe().catalog_calls, 0);
}

#[test]
fn quick_chat_without_default_delegates_to_selector() {
    let cfg = config(r#"{"executable":"/usr/bin/ollama"}"#);
    let mut cache = StatusCache::from_config(FakeProbe::up(TAGS, ""), &cfg);
    let mut host = FakeHost::picking("phi3:mini");

    let outcome = quick_chat(&mut cache, &cfg, &mut host, now());

    assert_eq!(outcome, ActionOutcome::Launched("phi3:mini".to_string()));
    assert_eq!(host.menus[0].0, "Select model");
}

#[test]
fn resume_with_feature_off_notifies() {
    let cfg = config("{}");
    let mut host = FakeHost::default();
    assert_eq!(
        resume_session(&cfg, &mut host),
        ActionOutcome::Notified(Notice::SessionsDisabled)
    );
    assert!(host.menus.is_empty());
}

#[test]
fn resume_with_no_sessions_notifies() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let cfg = sessions_config(&tmp.path().join("sessions"));
    let mut host = FakeHost::default();
    assert_eq!(
        resume_session(&cfg, &mut host),
        ActionOutcome::Notified(Notice::NoSessions)
    );
    assert!(host.launched.is_empty());
}

#[test]
fn resume_derives_model_from_label() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    fs::write(tmp.path().join("llama3.2_2024-01-01.json"), "{}").expect("write");
    let cfg = sessions_config(tmp.path());
    let mut host = FakeHost::picking("llama3.2_2024-01-01");

    let outcome = resume_session(&cfg, &mut host);

    assert_eq!(outcome, ActionOutcome::Launched("llama3.2".to_string()));
    assert_eq!(host.menus[0].1, vec!["llama3.2_2024-01-01".to_string()]);
    assert_eq!(host.launched[0].model, "llama3.2");
}

#[test]
fn launch_records_session_when_enabled() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let dir = tmp.path().join("nested").join("sessions");
    let mut cfg = sessions_config(&dir);
    cfg.default_model = Some("llama3.2".to_string());
    let mut cache = StatusCache::from_config(FakeProbe::down(), &cfg);
    let mut host = FakeHost::default();

    quick_chat(&mut cache, &cfg, &mut host, now());

    let saved = sessions::list_sessions(&dir).expect("list");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].model(), "llama3.2");
}

#[test]
fn launch_prunes_sessions_beyond_cap() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let dir = tmp.path().join("sessions");
    fs::create_dir_all(&dir).expect("mkdir");
    let old = SystemTime::now() - Duration::from_secs(3600);
    for i in 0..sessions::MAX_SESSIONS {
        let path = dir.join(format!("old{:02}_2024-01-01T00-00-00.json", i));
        fs::write(&path, "{}").expect("write");
        fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|f| f.set_modified(old - Duration::from_secs(i as u64)))
            .expect("set mtime");
    }
    let mut cfg = sessions_config(&dir);
    cfg.default_model = Some("llama3.2".to_string());
    let mut cache = StatusCache::from_config(FakeProbe::down(), &cfg);
    let mut host = FakeHost::default();

    quick_chat(&mut cache, &cfg, &mut host, now());

    let files = fs::read_dir(&dir).expect("read dir").count();
    assert_eq!(files, sessions::MAX_SESSIONS);
    assert!(!dir.join("old19_2024-01-01T00-00-00.json").exists());
    let saved = sessions::list_sessions(&dir).expect("list");
    assert_eq!(saved[0].model(), "llama3.2");
}

#[test]
fn launch_failure_becomes_notice() {
    let cfg = config(r#"{"default_model":"llama3.2"}"#);
    let mut cache = StatusCache::from_config(FakeProbe::down(), &cfg);
    let mut host = FakeHost {
        fail_launch: true,
        ..Default::default()
    };

    let outcome = quick_chat(&mut cache, &cfg, &mut host, now());

    assert!(matches!(
        outcome,
        ActionOutcome::Notified(Notice::LaunchFailed(_))
    ));
    assert_eq!(host.notices.len(), 1);
}
