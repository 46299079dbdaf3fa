//! GPU-backed lifecycle tests. These need a real adapter, so they are gated
//! behind the `integration-tests` feature:
//!
//! `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

use vantage::camera::{Camera, CameraController, CameraResources};
use vantage::console::Console;
use vantage::render::{FrameStats, Renderer};
use vantage::resources::mesh::{MeshRecord, MeshRegistry, UploadError};
use vantage::resources::primitives;
use vantage::resources::texture::{self, DepthTexture};
use vantage::scene::node::GameObject;
use vantage::scene::scene::Scene;

fn create_device() -> (wgpu::Device, wgpu::Queue) {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("no GPU adapter available");
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("no GPU device available")
    })
}

fn offscreen_config() -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        width: 256,
        height: 256,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

fn offscreen_target(device: &wgpu::Device) -> (wgpu::TextureView, DepthTexture) {
    let colour = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen colour"),
        size: wgpu::Extent3d {
            width: 256,
            height: 256,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = colour.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = DepthTexture::create(device, [256, 256], "offscreen depth");
    (view, depth)
}

fn camera_resources(device: &wgpu::Device) -> CameraResources {
    CameraResources::new(
        device,
        Camera::new((0.0, 2.0, 5.0), cgmath::Deg(-90.0), cgmath::Deg(-20.0)),
        CameraController::new(4.0, 0.4),
    )
}

#[test]
fn upload_then_release_restores_the_initial_state() {
    let (device, _queue) = create_device();
    let mut record = primitives::pyramid();
    assert!(!record.is_uploaded());

    record.upload(&device).expect("upload");
    assert!(record.is_uploaded());

    record.release();
    assert!(!record.is_uploaded());
    assert!(record.gpu().is_none());

    // releasing again is a no-op
    record.release();
    assert!(!record.is_uploaded());
}

#[test]
fn double_upload_keeps_the_record_uploaded() {
    let (device, _queue) = create_device();
    let mut record = primitives::cube();
    record.upload(&device).expect("first upload");
    record.upload(&device).expect("second upload is tolerated");
    assert!(record.is_uploaded());
    record.release();
}

#[test]
fn degenerate_geometry_is_rejected_at_upload() {
    let (device, _queue) = create_device();

    let mut empty = MeshRecord::new("empty", Vec::new(), None, None, Vec::new());
    assert!(matches!(
        empty.upload(&device),
        Err(UploadError::NoVertices(_))
    ));

    let mut no_indices = MeshRecord::new("lonely", vec![[0.0, 0.0, 0.0]], None, None, Vec::new());
    assert!(matches!(
        no_indices.upload(&device),
        Err(UploadError::NoIndices(_))
    ));

    let mut broken = MeshRecord::new(
        "broken",
        vec![[0.0, 0.0, 0.0]],
        None,
        None,
        vec![0, 1, 2],
    );
    assert!(matches!(
        broken.upload(&device),
        Err(UploadError::IndexOutOfRange { .. })
    ));
    assert!(!broken.is_uploaded());
}

#[test]
fn destroying_a_subtree_releases_every_transitive_handle() {
    let (device, queue) = create_device();
    let layout = texture::material_bind_group_layout(&device);

    let root = GameObject::new("model");
    let limb = GameObject::new("limb");
    root.add_child(&limb).expect("attach limb");

    let root_mesh = primitives::cube().into_handle();
    let limb_mesh = primitives::pyramid().into_handle();
    root.attach_mesh(root_mesh.clone());
    limb.attach_mesh(limb_mesh.clone());
    let material = limb.ensure_material();

    root_mesh.borrow_mut().upload(&device).expect("upload");
    limb_mesh.borrow_mut().upload(&device).expect("upload");
    material.borrow_mut().upload(&device, &queue, &layout);
    assert!(material.borrow().is_uploaded());

    root.release_gpu_resources();

    assert!(!root_mesh.borrow().is_uploaded());
    assert!(!limb_mesh.borrow().is_uploaded());
    assert!(!material.borrow().is_uploaded());
}

#[test]
fn registry_clear_releases_uploaded_entries() {
    let (device, _queue) = create_device();
    let mut registry = MeshRegistry::new();

    let a = primitives::cube().into_handle();
    let b = primitives::pyramid().into_handle();
    a.borrow_mut().upload(&device).expect("upload");
    b.borrow_mut().upload(&device).expect("upload");
    registry.register(a.clone(), None);
    registry.register(b.clone(), None);

    registry.clear();

    assert!(registry.is_empty());
    assert!(!a.borrow().is_uploaded());
    assert!(!b.borrow().is_uploaded());
}

#[test]
fn empty_registry_draws_exactly_one_fallback_primitive() {
    let (device, queue) = create_device();
    let camera = camera_resources(&device);
    let mut renderer = Renderer::new(&device, &queue, &offscreen_config(), &camera.bind_group_layout);
    let (colour, depth) = offscreen_target(&device);

    let scene = Scene::new();
    let stats = renderer.render(&device, &queue, &colour, &depth.view, &camera.bind_group, &scene);

    assert_eq!(
        stats,
        FrameStats {
            registry_draws: 0,
            fallback_draws: 1,
            skipped: 0
        }
    );
}

#[test]
fn unuploaded_registry_entries_are_skipped_not_drawn() {
    let (device, queue) = create_device();
    let camera = camera_resources(&device);
    let mut renderer = Renderer::new(&device, &queue, &offscreen_config(), &camera.bind_group_layout);
    let (colour, depth) = offscreen_target(&device);

    let mut scene = Scene::new();
    let uploaded = primitives::cube().into_handle();
    uploaded.borrow_mut().upload(&device).expect("upload");
    scene.registry_mut().register(uploaded, None);
    scene
        .registry_mut()
        .register(primitives::pyramid().into_handle(), None);

    let stats = renderer.render(&device, &queue, &colour, &depth.view, &camera.bind_group, &scene);

    assert_eq!(stats.registry_draws, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.fallback_draws, 0);
}

#[test]
fn texture_drop_with_no_model_updates_the_default_material_only() {
    let (device, queue) = create_device();
    let camera = camera_resources(&device);
    let mut renderer = Renderer::new(&device, &queue, &offscreen_config(), &camera.bind_group_layout);

    let dir = std::env::temp_dir().join("vantage_gpu_tests");
    std::fs::create_dir_all(&dir).expect("create test dir");
    let path = dir.join("drop.png");
    image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 200, 30, 255]))
        .save(&path)
        .expect("write png");

    let scene = Scene::new();
    let mut console = Console::new();
    let applied = renderer.apply_texture_to_default(
        &path.to_string_lossy(),
        &device,
        &queue,
        &mut console,
    );

    assert!(applied);
    assert_eq!(scene.registry().len(), 0);
    assert_eq!(
        renderer.default_material().texture_path(),
        path.to_string_lossy()
    );
    assert!(renderer.default_material().is_uploaded());
}
