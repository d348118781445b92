//! End-to-end wake cycle scenarios over the mock platform
//!
//! Each test plays one or more full wake cycles: read the configuration from
//! the card, apply sensor overrides, store captures, run the upload batch,
//! and check what survives on the card for the next cycle.

use trailcam::config::{self, AppConfig, SecretKey, SensorParam};
use trailcam::platform::mock::{MockRng, MockSensor, MockStorage, MockTimer, MockTransport};
use trailcam::upload::{
    self, store_picture, upload_pending, upload_snapshot, FileCounters, UploadError,
    COUNTERS_FILE,
};

fn device_key() -> SecretKey {
    // Reversed-MAC rule, fixed MAC for the test device
    SecretKey::from_mac(&[0x7c, 0xf5, 0x9c, 0x60, 0x62, 0xec])
}

fn card_with_config() -> MockStorage {
    let mut storage = MockStorage::new();
    storage.insert(
        config::CONFIG_FILE,
        b"# site A\n\
          savePictureOnSdCard=true\n\
          [wifi]\n\
          enabled=true\n\
          ssid=FieldNet\n\
          password=opensesame\n\
          [upload]\n\
          enabled=true\n\
          serverAddress=pictures.example.org\n\
          serverPort=8080\n\
          path=/upload.php\n\
          auth=token123\n\
          bunchSize=2\n\
          [sensor]\n\
          brightness=2\n\
          vflip=1\n",
    );
    storage
}

#[test]
fn full_wake_cycle_stores_and_uploads() {
    let mut storage = card_with_config();
    let mut transport = MockTransport::new();
    let mut timer = MockTimer::new();
    let mut sensor = MockSensor::new();

    // Boot: configuration
    let mut app = AppConfig::default();
    let report = config::init_app_config(&mut app, &mut storage, &device_key()).unwrap();
    assert!(report.is_clean());
    assert!(app.upload.enabled);
    assert_eq!(app.upload.bunch_size, 2);

    // Camera init applies the overrides: 5 defaults + brightness (replaced) + vflip
    app.camera.sensor.apply_to(&mut sensor).unwrap();
    assert_eq!(app.camera.sensor.enabled_count(), 6);
    assert!(sensor
        .applied()
        .contains(&(SensorParam::Brightness, 2)));
    assert!(sensor.applied().contains(&(SensorParam::Vflip, 1)));

    // First cycle: one capture, not enough for a bunch
    let mut counters = FileCounters::load_or_create(&mut storage).unwrap();
    store_picture(&mut storage, &mut counters, b"frame-1").unwrap();
    upload_pending(
        &mut storage,
        &mut transport,
        &mut timer,
        &app.upload,
        &mut counters,
    )
    .unwrap();
    assert!(transport.requests().is_empty());

    // Second cycle: counters reloaded from the card, second capture arms the bunch
    let mut counters = FileCounters::load_or_create(&mut storage).unwrap();
    assert_eq!(counters.pictures, 1);
    store_picture(&mut storage, &mut counters, b"frame-2").unwrap();

    transport.push_ok_responses(2);
    upload_pending(
        &mut storage,
        &mut transport,
        &mut timer,
        &app.upload,
        &mut counters,
    )
    .unwrap();

    assert_eq!(transport.requests().len(), 2);
    assert_eq!(transport.targets()[0].0, "pictures.example.org");
    assert_eq!(transport.targets()[0].1, 8080);
    assert_eq!(
        storage.contents(COUNTERS_FILE).unwrap(),
        b"pictureCounter=2\nuploadedPictureCounter=2\n"
    );
}

#[test]
fn failed_upload_resumes_on_next_cycle() {
    let mut storage = card_with_config();
    let mut transport = MockTransport::new();
    let mut timer = MockTimer::new();

    let mut app = AppConfig::default();
    config::init_app_config(&mut app, &mut storage, &device_key()).unwrap();

    // Three captures across cycles
    let mut counters = FileCounters::load_or_create(&mut storage).unwrap();
    for frame in [b"frame-1" as &[u8], b"frame-2", b"frame-3"] {
        store_picture(&mut storage, &mut counters, frame).unwrap();
    }

    // Server accepts the first picture, then breaks
    transport.push_response(b"HTTP/1.1 200 OK\r\n");
    transport.push_response(b"HTTP/1.1 500 Server Error\r\n");
    let result = upload_pending(
        &mut storage,
        &mut transport,
        &mut timer,
        &app.upload,
        &mut counters,
    );
    assert_eq!(result, Err(UploadError::Rejected(500)));
    assert_eq!(
        storage.contents(COUNTERS_FILE).unwrap(),
        b"pictureCounter=3\nuploadedPictureCounter=1\n"
    );

    // Power loss; next boot reloads the persisted prefix and resumes at item 2
    let mut counters = FileCounters::load_or_create(&mut storage).unwrap();
    assert_eq!(counters.uploaded, 1);
    transport.push_ok_responses(2);
    upload_pending(
        &mut storage,
        &mut transport,
        &mut timer,
        &app.upload,
        &mut counters,
    )
    .unwrap();

    let retried = String::from_utf8_lossy(&transport.requests()[2]).into_owned();
    assert!(retried.contains("pic-00002.jpg"));
    assert_eq!(
        storage.contents(COUNTERS_FILE).unwrap(),
        b"pictureCounter=3\nuploadedPictureCounter=3\n"
    );
}

#[test]
fn encrypted_secrets_reach_the_request() {
    let key = device_key();
    let mut enc_buf = [0u8; 128];
    let auth_cipher = {
        let encoded = trailcam::config::secret::encode("fieldtoken", &key, &mut enc_buf).unwrap();
        String::from(encoded)
    };

    let mut config_text = String::from(
        "[upload]\nenabled=true\nserverAddress=pictures.example.org\npath=/upload.php\nbunchSize=1\nauthEnc=",
    );
    config_text.push_str(&auth_cipher);
    config_text.push('\n');

    let mut storage = MockStorage::new();
    storage.insert(config::CONFIG_FILE, config_text.as_bytes());

    let mut app = AppConfig::default();
    let report = config::init_app_config(&mut app, &mut storage, &key).unwrap();
    assert!(report.is_clean());
    assert_eq!(app.upload.auth.as_str(), "fieldtoken");

    // The decoded token is what goes on the wire
    let mut transport = MockTransport::new();
    transport.push_ok_responses(1);
    let mut timer = MockTimer::new();
    let mut counters = FileCounters::load_or_create(&mut storage).unwrap();
    store_picture(&mut storage, &mut counters, b"frame").unwrap();
    upload_pending(
        &mut storage,
        &mut transport,
        &mut timer,
        &app.upload,
        &mut counters,
    )
    .unwrap();

    let request = String::from_utf8_lossy(&transport.requests()[0]).into_owned();
    assert!(request.contains("name=\"auth\"\r\n\r\nfieldtoken\r\n"));
}

#[test]
fn non_persisting_device_uses_snapshot_path() {
    let mut storage = MockStorage::new();
    storage.insert(
        config::CONFIG_FILE,
        b"savePictureOnSdCard=false\n\
          [upload]\n\
          enabled=true\n\
          serverAddress=pictures.example.org\n\
          path=/upload.php\n\
          fileNameRandSize=6\n",
    );

    let mut app = AppConfig::default();
    config::init_app_config(&mut app, &mut storage, &device_key()).unwrap();
    assert!(!app.save_picture_on_sd);

    let mut transport = MockTransport::new();
    transport.push_ok_responses(1);
    let mut timer = MockTimer::new();
    let mut rng = MockRng::new(2024);

    let name = upload_snapshot(
        &mut transport,
        &mut timer,
        &mut rng,
        &app.upload,
        b"framedata",
    )
    .unwrap();

    assert_eq!(name.len(), "pic-.jpg".len() + 6);
    // Nothing was written to the card and no counters exist
    assert_eq!(storage.file_count(), 1);
    assert!(storage.contents(upload::COUNTERS_FILE).is_none());
}

#[test]
fn unreadable_config_falls_back_to_defaults_when_ignoring_errors() {
    let mut storage = MockStorage::new(); // no config file at all

    let mut app = AppConfig::default();
    let report = config::init_app_config(&mut app, &mut storage, &device_key()).unwrap();
    assert!(report.read_failed);
    let expected = AppConfig {
        config_read_done: true,
        ..AppConfig::default()
    };
    assert_eq!(app, expected);
}
