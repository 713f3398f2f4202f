//! Live preview support for editing front-ends.
//!
//! [`PreviewSession`] re-renders only when a composition's fingerprint
//! changes and the preview is visible. [`PreviewWorker`] moves rendering onto
//! a dedicated thread so async callers are never blocked by a render.

use std::sync::mpsc::{self, Sender};
use std::thread;

use log::debug;
use sha2::{Digest, Sha256};
use tokio::sync::oneshot;

use crate::model::{Composition, SectionContent};
use crate::{Bitmap, Error, RenderConfig, Renderer, Result};

/// Hex SHA-256 over everything that affects the rendered output.
pub fn fingerprint(composition: &Composition) -> String {
    let mut h = Sha256::new();
    h.update((composition.lists.len() as u64).to_le_bytes());
    for list in &composition.lists {
        h.update(list.width.to_le_bytes());
        h.update(list.height.to_le_bytes());
        h.update((list.rows.len() as u64).to_le_bytes());
        for row in &list.rows {
            h.update((row.sections.len() as u64).to_le_bytes());
            for section in &row.sections {
                h.update((section.font_family.len() as u64).to_le_bytes());
                h.update(section.font_family.as_bytes());
                h.update(section.font_size.to_bits().to_le_bytes());
                match &section.content {
                    SectionContent::Empty => h.update([0u8]),
                    SectionContent::Text(text) => {
                        h.update([1u8]);
                        h.update((text.len() as u64).to_le_bytes());
                        h.update(text.as_bytes());
                    }
                    SectionContent::Image(img) => {
                        h.update([2u8]);
                        h.update(img.width().to_le_bytes());
                        h.update(img.height().to_le_bytes());
                        h.update(img.pixels.as_raw());
                    }
                }
            }
        }
    }
    hex::encode(h.finalize())
}

/// Change-gated renderer for a preview pane.
pub struct PreviewSession {
    renderer: Renderer,
    active: bool,
    last_fingerprint: Option<String>,
    last: Option<Bitmap>,
}

impl PreviewSession {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer, active: true, last_fingerprint: None, last: None }
    }

    /// Hidden previews skip rendering until shown again.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Most recent successful render.
    pub fn last(&self) -> Option<&Bitmap> {
        self.last.as_ref()
    }

    /// Render `composition` if it changed since the last successful render.
    ///
    /// Returns `None` when inactive or unchanged. A failed render keeps the
    /// previous bitmap and fingerprint, so the next refresh retries.
    pub fn refresh(&mut self, composition: &Composition) -> Result<Option<&Bitmap>> {
        if !self.active {
            return Ok(None);
        }
        let current = fingerprint(composition);
        if self.last_fingerprint.as_deref() == Some(current.as_str()) {
            return Ok(None);
        }
        debug!("composition changed ({}), re-rendering preview", &current[..12]);
        let bitmap = self.renderer.render(composition)?;
        self.last_fingerprint = Some(current);
        self.last = Some(bitmap);
        Ok(self.last.as_ref())
    }
}

enum Command {
    Render(Box<Composition>, oneshot::Sender<Result<Bitmap>>),
    Close(oneshot::Sender<()>),
}

/// Async handle to a renderer that lives on its own thread.
///
/// The thread owns the [`Renderer`]; callers send composition snapshots and
/// await the bitmap.
#[derive(Clone)]
pub struct PreviewWorker {
    cmd_tx: Sender<Command>,
}

impl PreviewWorker {
    /// Spawn the worker thread and build its renderer there.
    pub async fn new(config: RenderConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let mut renderer = match Renderer::new(config) {
                Ok(r) => r,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(snapshot, resp) => {
                        let _ = resp.send(renderer.render(&snapshot));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            debug!("preview worker stopped");
        });

        init_rx.await.map_err(|_| worker_gone())??;
        Ok(Self { cmd_tx })
    }

    /// Render a snapshot on the worker thread.
    pub async fn render(&self, snapshot: Composition) -> Result<Bitmap> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Render(Box::new(snapshot), tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())?
    }

    /// Stop the worker thread. Later renders fail with a render error.
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Close(tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())
    }
}

fn worker_gone() -> Error {
    Error::RenderError("preview worker is not running".into())
}
