/// Clock host: drives a clock face on a timer and ships each frame out.
use anyhow::{Context, Result};
use std::io::Write;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::config::{ClockVariant, HostConfig, OutputMode};
use crate::render::ClockFace;
use crate::render::faces::analog::AnalogClock;
use crate::render::faces::segment::SegmentClock;
use crate::render::surface::PixmapSurface;

pub struct ClockHost {
    config: HostConfig,
    face: Box<dyn ClockFace>,
}

impl ClockHost {
    pub fn new(config: HostConfig) -> Result<Self> {
        let surface = PixmapSurface::new(config.width, config.height);
        if surface.is_none() {
            warn!(
                "Cannot create {}x{} surface; clock will not draw",
                config.width, config.height
            );
        }

        let mut face: Box<dyn ClockFace> = match config.variant {
            ClockVariant::Digital => Box::new(SegmentClock::new(surface)),
            ClockVariant::Analog => Box::new(AnalogClock::new(surface)),
        };

        if let Some(ref colors) = config.colors {
            let value: serde_json::Value =
                serde_json::from_str(colors).context("Failed to parse --colors JSON")?;
            face.set_colors(&value);
            debug!("Initial colors: {:?}", face.get_colors());
        }

        Ok(Self { config, face })
    }

    pub fn face(&self) -> &dyn ClockFace {
        self.face.as_ref()
    }

    /// Draw the current time and return the resulting image string.
    pub fn tick(&mut self) -> String {
        self.face.draw_clock();
        self.face.get_image_data()
    }

    /// Tick loop
    pub async fn run(&mut self) -> Result<()> {
        let mut interval = time::interval(Duration::from_millis(self.config.interval_ms.max(1)));
        let mut ticks: u64 = 0;

        info!(
            "Starting {:?} clock: {}x{} every {}ms, output: {:?}",
            self.config.variant,
            self.config.width,
            self.config.height,
            self.config.interval_ms,
            self.config.output_mode
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.face.draw_clock();

                    match self.config.output_mode {
                        OutputMode::Png => {
                            let path = &self.config.output_path;
                            self.face
                                .save_png(path)
                                .context("Failed to write clock frame")?;
                            debug!("Saved tick {} to {}", ticks, path.display());
                        }
                        OutputMode::DataUri => {
                            let data = self.face.get_image_data();
                            let mut out = std::io::stdout().lock();
                            writeln!(out, "{data}").context("Failed to write to stdout")?;
                        }
                        OutputMode::None => {}
                    }

                    ticks += 1;
                    if self.config.frames > 0 && ticks >= self.config.frames {
                        info!("Rendered {} tick(s), stopping", ticks);
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted after {} tick(s)", ticks);
                    break;
                }
            }
        }

        Ok(())
    }
}
