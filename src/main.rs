// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::{Arc, Mutex};

use accel_engine::config::{load_config, AccelConfig};
use accel_engine::engine::DUALCAST_ALIGNMENT;
use accel_engine::{AccelChannel, AccelFramework, AccelTask};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

type Status = Arc<Mutex<Option<i32>>>;

fn status_slot() -> Status {
    Arc::new(Mutex::new(None))
}

fn store(slot: &Status) -> impl FnOnce(i32) + Send + 'static {
    let slot = Arc::clone(slot);
    move |status| {
        if let Ok(mut guard) = slot.lock() {
            *guard = Some(status);
        }
    }
}

fn read(slot: &Status) -> String {
    match slot.lock().ok().and_then(|guard| *guard) {
        Some(status) => status.to_string(),
        None => "pending".to_string(),
    }
}

fn run_operations(channel: &mut AccelChannel, task_size: usize) -> Result<()> {
    let mut task = AccelTask::new(task_size);
    let src: Vec<u8> = b"accelerate all the bytes".to_vec();
    let len = src.len();

    let copied = status_slot();
    let mut dst = vec![0u8; len];
    channel.submit_copy(&mut task, &mut dst, &src, len, store(&copied))?;
    println!(
        "📋 copy      status={} dst={:?}",
        read(&copied),
        String::from_utf8_lossy(&dst)
    );

    let filled = status_slot();
    let mut region = vec![0u8; 16];
    channel.submit_fill(&mut task, &mut region, 0xA5, 16, store(&filled))?;
    println!("🧱 fill      status={} dst={:02x?}", read(&filled), &region[..4]);

    let compared = status_slot();
    channel.submit_compare(&mut task, &src, &dst, len, store(&compared))?;
    println!("⚖️  compare   status={} (0 means equal)", read(&compared));

    let crc_done = status_slot();
    let mut crc = 0u32;
    channel.submit_crc32c(&mut task, &mut crc, b"123456789", 0, 9, store(&crc_done))?;
    println!(
        "🔢 crc32c    status={} crc={:#010x} finalized={:#010x}",
        read(&crc_done),
        crc,
        !crc
    );

    let mut raw1 = vec![0u8; DUALCAST_ALIGNMENT + len];
    let mut raw2 = vec![0u8; DUALCAST_ALIGNMENT + len];
    let off1 = raw1.as_ptr().align_offset(DUALCAST_ALIGNMENT);
    let off2 = raw2.as_ptr().align_offset(DUALCAST_ALIGNMENT);
    let cast = status_slot();
    channel.submit_dualcast(
        &mut task,
        &mut raw1[off1..off1 + len],
        &mut raw2[off2..off2 + len],
        &src,
        len,
        store(&cast),
    )?;
    println!(
        "📡 dualcast  status={} equal={}",
        read(&cast),
        raw1[off1..off1 + len] == raw2[off2..off2 + len]
    );

    match channel.batch_create() {
        Ok(_) => println!("📦 batching  up to {} ops", channel.batch_get_max()),
        Err(e) => println!("📦 batching  unavailable: {}", e),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => {
            load_config(&path).with_context(|| format!("loading config from {}", path))?
        }
        None => AccelConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    println!("🚀 Accel Engine Demo");
    println!("════════════════════");

    let framework = AccelFramework::builder()
        .initialize(&config)
        .context("bringing up the accel framework")?;
    println!(
        "Task size: {} bytes, hardware engine: {}",
        framework.task_size(),
        framework
            .engines()
            .hw()
            .map(|engine| engine.name())
            .unwrap_or("none")
    );

    {
        let mut channel = framework.get_io_channel()?;
        println!(
            "Channel {} bound to the {} engine ({:?})",
            channel.id(),
            channel.engine_name(),
            channel.get_capabilities()
        );
        println!();
        run_operations(&mut channel, framework.task_size())?;
        framework.put_io_channel(channel);
    }

    let mut text = String::new();
    framework.config_text(&mut text)?;
    println!();
    println!("Config (json): {}", framework.write_config_json());
    if !text.is_empty() {
        println!("Config (text):\n{}", text);
    }

    framework.finish_async().await?;
    println!("✅ Finished");
    Ok(())
}
