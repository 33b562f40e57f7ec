use anyhow::{Context, Result};

use lumen_engine::caps::{MinMagFilter, TexTarget, TexUnit};
use lumen_engine::coords::Viewport;
use lumen_engine::device::{HeadlessInit, WgpuContext, STORAGE_FORMAT};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::texture::{Texture, TextureDesc};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut gl = pollster::block_on(WgpuContext::headless(HeadlessInit::default()))
        .context("headless GPU bring-up failed")?;

    println!();
    println!("  lumen studio  ·  texture smoke run");
    println!();

    // ── owned, padded ─────────────────────────────────────────────────────
    let desc = TextureDesc::new(100, 60)
        .power_of_two(true)
        .filter(MinMagFilter::Nearest);
    let mut padded = Texture::create(&mut gl, desc).context("padded texture")?;
    report("padded", &padded);

    padded
        .load_pixels(&mut gl, 100, 60, &gradient(100, 60))
        .context("upload within backing")?;
    report("padded, reloaded", &padded);

    padded
        .load_pixels(&mut gl, 300, 200, &gradient(300, 200))
        .context("upload beyond backing")?;
    report("padded, grown", &padded);

    // ── wrapped ───────────────────────────────────────────────────────────
    let external = gl.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("studio external"),
        size: wgpu::Extent3d {
            width: 64,
            height: 64,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: STORAGE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let external_id = gl.import_texture(external.clone())?;
    let unit1 = TexUnit::new(1).context("unit 1")?;
    let mut wrapped = Texture::wrap(&mut gl, TexTarget::Texture2D, unit1, external_id, 64, 64)?;
    wrapped.load_pixels(&mut gl, 32, 32, &gradient(32, 32))?;
    report("wrapped", &wrapped);

    // ── binding ───────────────────────────────────────────────────────────
    padded.set_viewport(&mut gl, Viewport::new(10, 10, 200, 120));
    wrapped.bind(&mut gl);
    padded.bind(&mut gl);
    println!(
        "  bound: unit0={:?} unit1={:?} viewport={:?}",
        gl.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D),
        gl.bound_texture(unit1, TexTarget::Texture2D),
        gl.viewport(),
    );
    padded.unbind(&mut gl);
    wrapped.unbind(&mut gl);

    gl.flush();

    padded.release(&mut gl);
    wrapped.release(&mut gl);
    println!(
        "  released: padded valid={} wrapped valid={} live names={}",
        padded.is_valid(),
        wrapped.is_valid(),
        gl.live_textures(),
    );
    println!();

    external.destroy();
    log::info!("smoke run complete");
    Ok(())
}

fn report(label: &str, tex: &Texture) {
    let (sx, sy) = tex.tex_matrix().scale_factors();
    println!(
        "  {label:<18} id={:<4} image={}x{} storage={}x{} scale=({sx:.5}, {sy:.5})",
        tex.id().map_or(0, |id| id.get()),
        tex.width(),
        tex.height(),
        tex.tex_width(),
        tex.tex_height(),
    );
}

/// Horizontal red / vertical green ramp, tightly packed RGBA8.
fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
            let g = (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8;
            out.extend_from_slice(&[r, g, 0x40, 0xff]);
        }
    }
    out
}
