/// Build script for scene_viewer
///
/// WGSL shaders are embedded with `include_str!`, so cargo only needs to
/// know when they change.
fn main() {
    println!("cargo:rerun-if-changed=src/renderer/shaders/model.wgsl");
    println!("cargo:rerun-if-changed=src/renderer/shaders/shadow.wgsl");
    println!("cargo:rerun-if-changed=src/renderer/shaders/skybox.wgsl");
    println!("cargo:rerun-if-changed=src/renderer/shaders/bloom.wgsl");
}
