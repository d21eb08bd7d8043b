//! Pack and unpack through the filesystem, as the command-line tool does.

use std::fs;
use std::path::Path;

use crx3::container;
use crx3::identity;
use crx3::identity::PermittedKey;
use crx3::keys;
use crx3::pack;
use crx3::pack::PackOptions;
use crx3::unpack;
use crx3::unpack::UnpackOptions;
use crx3::verifier;
use crx3::Algorithm;
use crx3::Crx3Error;
use crx3::PrivateKey;

fn hello_extension(root: &Path) -> std::path::PathBuf {
    let dir = root.join("hello");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("hello.txt"), b"hi").unwrap();
    dir
}

#[test]
fn hello_scenario() {
    let root = tempfile::tempdir().unwrap();
    let src = hello_extension(root.path());

    let outcome = pack::pack(&src, PackOptions::default()).unwrap();
    let crx_path = root.path().join("hello.crx");
    assert_eq!(outcome.crx_path, crx_path);

    let bytes = fs::read(&crx_path).unwrap();
    assert_eq!(&bytes[..4], b"Cr24");
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 3);

    // No permitted key: extraction proceeds unauthenticated.
    let out = tempfile::tempdir().unwrap();
    let options = UnpackOptions { out_dir: Some(out.path().to_path_buf()), ..Default::default() };
    let unpacked = unpack::unpack(&crx_path, &options).unwrap();
    assert!(!unpacked.authenticated);
    assert_eq!(fs::read(unpacked.path.join("hello.txt")).unwrap(), b"hi");

    // The generated key's identity is accepted.
    let out = tempfile::tempdir().unwrap();
    let options = UnpackOptions {
        out_dir: Some(out.path().to_path_buf()),
        permitted: Some(PermittedKey::Identity(outcome.identity.clone())),
        ..Default::default()
    };
    let unpacked = unpack::unpack(&crx_path, &options).unwrap();
    assert!(unpacked.authenticated);
    assert_eq!(unpacked.extension_id, outcome.extension_id);
    assert_eq!(fs::read(unpacked.path.join("hello.txt")).unwrap(), b"hi");

    // A different fresh key is rejected.
    let stranger = PrivateKey::generate(Algorithm::Ed25519);
    let out = tempfile::tempdir().unwrap();
    let options = UnpackOptions {
        out_dir: Some(out.path().to_path_buf()),
        permitted: Some(PermittedKey::Identity(identity::checksummed_identity(&stranger.public_key()))),
        ..Default::default()
    };
    let err = unpack::unpack(&crx_path, &options).unwrap_err();
    assert!(matches!(err, Crx3Error::PublicKeyNotPermitted(_)));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn generated_key_file_verifies_its_container() {
    let root = tempfile::tempdir().unwrap();
    let src = hello_extension(root.path());
    let options = PackOptions { algorithm: Algorithm::EcdsaP256, ..Default::default() };
    let outcome = pack::pack(&src, options).unwrap();

    let public = keys::load_public_key(&outcome.generated_key.unwrap()).unwrap();
    assert_eq!(public.algorithm(), Algorithm::EcdsaP256);

    let out = tempfile::tempdir().unwrap();
    let options = UnpackOptions {
        out_dir: Some(out.path().to_path_buf()),
        permitted: Some(PermittedKey::from(public)),
        ..Default::default()
    };
    assert!(unpack::unpack(&outcome.crx_path, &options).unwrap().authenticated);
}

#[test]
fn every_archive_byte_is_covered_by_the_signature() {
    let root = tempfile::tempdir().unwrap();
    let src = hello_extension(root.path());
    let outcome = pack::pack(&src, PackOptions::default()).unwrap();
    let bytes = fs::read(&outcome.crx_path).unwrap();
    let permitted = PermittedKey::Identity(outcome.identity);

    let archive_start = bytes.len() - container::decode(&bytes).unwrap().archive.len();
    for index in archive_start..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x80;
        let err = verifier::verify_container(&tampered, Some(&permitted)).unwrap_err();
        assert!(matches!(err, Crx3Error::SignatureDoesNotMatch), "byte {index}: {err}");
    }
}

#[test]
fn truncated_header_extracts_nothing() {
    let root = tempfile::tempdir().unwrap();
    let src = hello_extension(root.path());
    let outcome = pack::pack(&src, PackOptions::default()).unwrap();
    let bytes = fs::read(&outcome.crx_path).unwrap();

    // Keep the prefix and half of the header only.
    let header_len = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    let truncated = root.path().join("truncated.crx");
    fs::write(&truncated, &bytes[..container::PREFIX_LEN + header_len / 2]).unwrap();

    let out = tempfile::tempdir().unwrap();
    let options = UnpackOptions { out_dir: Some(out.path().to_path_buf()), ..Default::default() };
    let err = unpack::unpack(&truncated, &options).unwrap_err();
    assert!(matches!(err, Crx3Error::UnsupportedFileFormat(_)));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn repacking_with_saved_key_keeps_identity() {
    let root = tempfile::tempdir().unwrap();
    let src = hello_extension(root.path());
    let first = pack::pack(&src, PackOptions::default()).unwrap();

    let key = keys::load_private_key(first.generated_key.as_ref().unwrap()).unwrap();
    let options = PackOptions {
        outfile: Some(root.path().join("hello-2.crx")),
        private_key: Some(key),
        ..Default::default()
    };
    let second = pack::pack(&src, options).unwrap();

    assert_eq!(second.identity, first.identity);
    assert_eq!(second.extension_id, first.extension_id);
    assert_eq!(second.generated_key, None);
}
