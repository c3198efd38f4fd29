//! End-to-end encrypt → decrypt through the orchestrator

use std::sync::Arc;

use hecrypt_core::*;

fn orchestrator() -> Orchestrator {
    let contexts = ContextManager::initialize(&SchemesConfig::insecure_fast())
        .expect("Context initialization should succeed");
    Orchestrator::new(Arc::new(contexts))
}

fn payload<'a>(batch: &'a BatchResult, tag: &str) -> &'a str {
    &batch
        .get(tag)
        .and_then(MethodOutcome::result)
        .unwrap_or_else(|| panic!("{tag} should succeed"))
        .encrypted_data
}

#[test]
fn test_ab_roundtrip_every_scheme() {
    let orch = orchestrator();
    let batch = orch.run("AB", &MethodRequest::All).unwrap();

    for id in SchemeId::ALL {
        let decrypted = orch.run_decrypt(id.as_str(), payload(&batch, id.as_str())).unwrap();
        assert_eq!(decrypted, "AB", "{id} round-trip");
    }
}

#[test]
fn test_empty_input_every_scheme() {
    let orch = orchestrator();
    let batch = orch.run("", &MethodRequest::All).unwrap();
    assert_eq!(batch.successes().count(), 3);

    for id in SchemeId::ALL {
        assert_eq!(orch.run_decrypt(id.as_str(), payload(&batch, id.as_str())).unwrap(), "");
    }
}

#[test]
fn test_unicode_and_repeated_characters() {
    let orch = orchestrator();
    // stays below the default BFV plaintext modulus (786433)
    let text = "zzzz\u{0}\u{0} naïve façade — 東京 🦀🦀 \u{2FFFF}";
    let batch = orch.run(text, &MethodRequest::All).unwrap();

    for id in SchemeId::ALL {
        assert_eq!(orch.run_decrypt(id.as_str(), payload(&batch, id.as_str())).unwrap(), text);
    }
}

#[test]
fn test_method_all_entries_independently_timed() {
    let orch = orchestrator();
    let batch = orch.run("timing", &MethodRequest::All).unwrap();
    assert_eq!(batch.len(), 3);
    for result in batch.successes() {
        assert!(result.elapsed.as_nanos() > 0);
        assert_eq!(result.size, result.ciphertext.len());
    }
}

#[test]
fn test_invalid_tag_alongside_valid_ones() {
    let orch = orchestrator();
    let request = MethodRequest::parse(Some("bfv,rsa,ckks")).unwrap();
    let batch = orch.run("AB", &request).unwrap();

    assert_eq!(batch.len(), 3);
    assert!(batch.get("bfv").unwrap().is_success());
    assert!(batch.get("ckks").unwrap().is_success());

    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "rsa");
    assert_eq!(failures[0].1.kind, ErrorKind::InvalidInput);
}

#[test]
fn test_unconfigured_tag_in_list_is_captured() {
    let config = SchemesConfig::insecure_fast().only(&[SchemeId::Bfv]);
    let orch = Orchestrator::new(Arc::new(ContextManager::initialize(&config).unwrap()));

    let request = MethodRequest::parse(Some("bfv,paillier")).unwrap();
    let batch = orch.run("AB", &request).unwrap();
    assert!(batch.get("bfv").unwrap().is_success());
    assert_eq!(
        batch.get("paillier").unwrap().error().unwrap().kind,
        ErrorKind::ContextUnavailable
    );
}

#[test]
fn test_bfv_overflow_is_per_method_failure() {
    let mut config = SchemesConfig::insecure_fast();
    config.bfv.plain_modulus = 257;
    let orch = Orchestrator::new(Arc::new(ContextManager::initialize(&config).unwrap()));

    let batch = orch.run("price: 5€", &MethodRequest::All).unwrap();
    assert_eq!(
        batch.get("bfv").unwrap().error().unwrap().kind,
        ErrorKind::EncodingError
    );
    assert!(batch.get("paillier").unwrap().is_success());
    assert!(batch.get("ckks").unwrap().is_success());
}

#[test]
fn test_packaged_artifact_roundtrip() {
    let orch = orchestrator();
    let batch = orch.run("persist me", &MethodRequest::All).unwrap();

    for result in batch.successes() {
        let artifact = result.package().unwrap();
        let decrypted = orch
            .run_decrypt_packaged(result.method.as_str(), &artifact)
            .unwrap();
        assert_eq!(decrypted, "persist me");
    }
}

#[test]
fn test_corrupted_artifact_is_compression_error() {
    let orch = orchestrator();
    let batch = orch.run("AB", &MethodRequest::from(SchemeId::Bfv)).unwrap();
    let artifact = batch.get("bfv").unwrap().result().unwrap().package().unwrap();

    let err = orch
        .run_decrypt_packaged("bfv", &artifact[..artifact.len() - 3])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CompressionError);
}

#[test]
fn test_malformed_payloads() {
    let orch = orchestrator();

    let err = orch.run_decrypt("bfv", "%%% not base64").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SerializationError);

    let err = orch.run_decrypt("bfv", "AQI=").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SerializationError);

    let err = orch.run_decrypt("rot13", "AQI=").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
