use super::*;

#[tokio::test]
async fn returns_value_from_worker() {
    let v = offload(|| Ok(21 * 2)).await.unwrap();
    assert_eq!(v, 42);
}

#[tokio::test]
async fn runs_off_the_calling_thread() {
    let caller = std::thread::current().id();
    let worker = offload(move || Ok(std::thread::current().id()))
        .await
        .unwrap();
    assert_ne!(caller, worker);
}

#[tokio::test]
async fn error_propagates_unchanged() {
    let err = offload::<_, ()>(|| Err(EditError::decode("bad bytes")))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::Decode(ref m) if m == "bad bytes"));
}

#[tokio::test]
#[should_panic(expected = "worker exploded")]
async fn panic_is_resumed_in_caller() {
    let _ = offload::<_, ()>(|| panic!("worker exploded")).await;
}
