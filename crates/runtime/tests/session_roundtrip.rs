//! Saving and loading sessions through the runtime.

use std::path::PathBuf;
use std::sync::Arc;

use tactics_content::ContentFactory;
use tactics_core::{Phase, PlayerCommand, Position, SessionSnapshot, UnitId};
use tactics_runtime::{
    FileSessionRepository, InMemorySessionRepository, OracleManager, Runtime, RuntimeConfig,
    RuntimeError, SessionRepository,
};

async fn runtime(repository: Option<Arc<dyn SessionRepository>>, session_id: &str) -> Runtime {
    let factory =
        ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"));
    let bundle = factory.load_bundle().unwrap();
    let state = factory
        .load_encounter("goblin_ambush")
        .unwrap()
        .build(&bundle.units)
        .unwrap();

    let config = RuntimeConfig {
        session_id: session_id.to_string(),
        ..RuntimeConfig::default()
    };
    let mut builder = Runtime::builder()
        .config(config)
        .oracles(OracleManager::from_bundle(bundle))
        .initial_state(state);
    if let Some(repository) = repository {
        builder = builder.repository(repository);
    }
    builder.build().await.expect("runtime should start")
}

#[tokio::test]
async fn file_round_trip_restores_the_saved_session() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(FileSessionRepository::new(dir.path()).unwrap());
    let runtime = runtime(Some(repository.clone()), "ambush").await;
    let handle = runtime.handle();

    handle
        .submit(PlayerCommand::Move {
            unit: UnitId::PLAYER,
            to: Position::new(3, 5),
        })
        .await
        .unwrap();
    handle
        .submit(PlayerCommand::Wait { unit: UnitId(1) })
        .await
        .unwrap();
    runtime.save().await.expect("save should succeed");
    let saved = handle.snapshot().await.unwrap();
    assert!(dir.path().join("session_ambush.json").exists());

    handle.end_phase().await.unwrap();
    assert_ne!(handle.snapshot().await.unwrap(), saved);

    runtime.load().await.expect("load should succeed");
    let restored = handle.query_state().await.unwrap();
    assert_eq!(SessionSnapshot::capture(&restored), saved);
    assert_eq!(restored.turn.phase, Phase::Player);
    assert!(restored.turn.has_acted(UnitId(1)));
    assert!(restored.unit(UnitId::PLAYER).unwrap().has_moved);
    restored.check_invariants().unwrap();
}

#[tokio::test]
async fn loading_an_unknown_session_fails() {
    let repository = Arc::new(InMemorySessionRepository::new());
    let runtime = runtime(Some(repository), "missing").await;
    assert!(matches!(
        runtime.load().await,
        Err(RuntimeError::SessionNotFound(id)) if id == "missing"
    ));
}

#[tokio::test]
async fn persistence_needs_a_repository() {
    let runtime = runtime(None, "none").await;
    assert!(matches!(
        runtime.save().await,
        Err(RuntimeError::RepositoryNotSet)
    ));
}

#[tokio::test]
async fn snapshot_json_uses_the_documented_shape() {
    let runtime = runtime(None, "shape").await;
    let snapshot = runtime.handle().snapshot().await.unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["phase"], "player");
    assert_eq!(value["turn"], 1);
    assert_eq!(value["player"]["entity"], "knight");
    assert_eq!(value["allies"].as_array().unwrap().len(), 3);
    assert_eq!(value["enemies"].as_array().unwrap().len(), 4);
}
