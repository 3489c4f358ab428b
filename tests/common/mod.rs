#![allow(dead_code)]

use altar_sorteio::store::FamilyStore;
use altar_sorteio::store::config::StoreConfig;
use altar_sorteio::store::paths::StorageLocations;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

pub fn store_at(root: &Path) -> FamilyStore {
    let locations = StorageLocations::at(root.to_path_buf(), root.join("bundle"));
    FamilyStore::open(locations, StoreConfig::default()).expect("open store")
}

pub fn write_sample_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]));
    img.save(path).expect("write sample jpeg");
}

pub fn family(numero: u32, nome: &str) -> Value {
    json!({
        "id": numero,
        "numero": numero,
        "nome": nome,
        "foto": "",
        "sorteado": false
    })
}

pub fn drawn_family(numero: u32, nome: &str, date: &str) -> Value {
    json!({
        "id": numero,
        "numero": numero,
        "nome": nome,
        "foto": "",
        "sorteado": true,
        "data_sorteio": date
    })
}

pub fn seed_families(root: &Path, records: &[Value]) {
    let file = root.join("dados").join("familias.json");
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(&file, serde_json::to_string_pretty(records).expect("json")).expect("seed");
}

pub fn seed_pointer(root: &Path, value: Value) {
    let file = root.join("dados").join("sorteio.json");
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(
        &file,
        serde_json::to_string_pretty(&json!({ "ultimo_sorteado": value })).expect("json"),
    )
    .expect("seed");
}

pub fn read_families(root: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(root.join("dados").join("familias.json")).expect("read");
    serde_json::from_str(&raw).expect("parse")
}

pub fn read_pointer(root: &Path) -> Option<u32> {
    let file = root.join("dados").join("sorteio.json");
    if !file.exists() {
        return None;
    }
    let raw = fs::read_to_string(&file).expect("read");
    let value: Value = serde_json::from_str(&raw).expect("parse");
    value
        .get("ultimo_sorteado")
        .and_then(Value::as_u64)
        .map(|n| n as u32)
}
