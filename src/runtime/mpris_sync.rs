use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let now = app.now_playing.as_ref();
    mpris.set_now_playing(now.map(|n| n.path.as_path()), now.and_then(|n| n.length_ms));
    mpris.set_playback(app.playback);
}
