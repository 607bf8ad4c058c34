use crate::constants::{SOUND_AMBIENCE_URL, SOUND_CLICK_URL, SOUND_EASTER_EGG_URL, SOUND_MUSIC_URL};
use room_core::audio::{FadeCommand, Sound, SoundRequest};
use room_core::constants::FADE_FLOOR;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// The WebAudio side of the room: two looping buses and one-shot sounds.
pub struct AudioOut {
    ctx: web::AudioContext,
    click: web::AudioBuffer,
    music: web::AudioBuffer,
    ambience: web::AudioBuffer,
    easter_egg: Option<web::AudioBuffer>,
    music_gain: web::GainNode,
    ambience_gain: web::GainNode,
    loops: Vec<web::AudioBufferSourceNode>,
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(ctx).map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

async fn load_buffer(ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {}: {:?}", url, e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let bytes = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("read {}: {:?}", url, e))?
        .dyn_into::<js_sys::ArrayBuffer>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let decoded = ctx
        .decode_audio_data(&bytes)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    JsFuture::from(decoded)
        .await
        .map_err(|e| anyhow::anyhow!("decode {}: {:?}", url, e))?
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

impl AudioOut {
    /// Create the context, decode every buffer and wire the two buses to
    /// the destination. Loops are not started yet.
    pub async fn init() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        _ = ctx.resume();
        let click = load_buffer(&ctx, SOUND_CLICK_URL).await?;
        let music = load_buffer(&ctx, SOUND_MUSIC_URL).await?;
        let ambience = load_buffer(&ctx, SOUND_AMBIENCE_URL).await?;
        let easter_egg = match load_buffer(&ctx, SOUND_EASTER_EGG_URL).await {
            Ok(b) => Some(b),
            Err(e) => {
                log::warn!("[audio] easter egg sound unavailable: {:?}", e);
                None
            }
        };
        let music_gain = create_gain(&ctx, 0.0, "music")?;
        let ambience_gain = create_gain(&ctx, 0.0, "ambience")?;
        music_gain
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        ambience_gain
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            ctx,
            click,
            music,
            ambience,
            easter_egg,
            music_gain,
            ambience_gain,
            loops: Vec::new(),
        })
    }

    /// Start both loops at the given bus volumes.
    pub fn start_loops(&mut self, music: f32, ambience: f32) -> anyhow::Result<()> {
        self.music_gain.gain().set_value(music);
        self.ambience_gain.gain().set_value(ambience);
        for (buffer, bus) in [
            (&self.music, &self.music_gain),
            (&self.ambience, &self.ambience_gain),
        ] {
            let src = self
                .ctx
                .create_buffer_source()
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            src.set_buffer(Some(buffer));
            src.set_loop(true);
            src.connect_with_audio_node(bus)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            src.start().map_err(|e| anyhow::anyhow!("{:?}", e))?;
            self.loops.push(src);
        }
        log::info!("[audio] loops started music={:.2} ambience={:.2}", music, ambience);
        Ok(())
    }

    pub fn play(&self, req: &SoundRequest) {
        let buffer = match req.sound {
            Sound::Click => &self.click,
            Sound::EasterEgg => match &self.easter_egg {
                Some(b) => b,
                None => return,
            },
        };
        let src = match self.ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[audio] buffer source error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(buffer));
        src.playback_rate().set_value(req.rate);
        let gain = match create_gain(&self.ctx, req.gain, "one-shot") {
            Ok(g) => g,
            Err(e) => {
                log::warn!("[audio] {:?}", e);
                return;
            }
        };
        _ = src.connect_with_audio_node(&gain);
        _ = gain.connect_with_audio_node(&self.ctx.destination());
        let _ = src.start();
    }

    /// Exponential ramp of both buses from their current values.
    pub fn fade(&self, cmd: &FadeCommand) {
        let now = self.ctx.current_time();
        let end = now + cmd.duration_sec;
        let (music, ambience) = cmd.ramp_targets();
        for (bus, target) in [(&self.music_gain, music), (&self.ambience_gain, ambience)] {
            let p = bus.gain();
            _ = p.cancel_scheduled_values(now);
            _ = p.set_value_at_time(p.value().max(FADE_FLOOR), now);
            _ = p.exponential_ramp_to_value_at_time(target, end);
        }
        if cmd.ends_silent() {
            _ = self.music_gain.gain().set_value_at_time(0.0, end + 0.01);
        }
        log::debug!("[audio] fade to ({:.4}, {:.4}) over {}s", music, ambience, cmd.duration_sec);
    }
}
