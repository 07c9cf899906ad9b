use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct Playlist {
    /// シャッフル済みの画像リスト
    entries: Vec<PathBuf>,
    /// 次に advance で返す位置
    cursor: usize,
    /// 表示履歴（戻るナビゲーション用）
    history: Vec<PathBuf>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            history: Vec::new(),
        }
    }
}

impl Playlist {
    /// フォルダ直下の全ファイルを読み込み、一度だけシャッフルする
    pub fn load(&mut self, folder: &Path) {
        self.entries = WalkDir::new(folder)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file())
            .collect();
        self.entries.shuffle(&mut rand::thread_rng());
        self.cursor = 0;
        self.history.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// リスト内での位置（ステータスバー表示用）
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|p| p == path)
    }

    /// 次の画像へ進む（末尾まで行ったら先頭に戻る）
    pub fn advance(&mut self) -> Option<PathBuf> {
        if self.entries.is_empty() {
            return None;
        }
        let path = self.entries[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.history.push(path.clone());
        Some(path)
    }

    /// 一つ前の画像に戻る
    /// 現在の画像を履歴から捨て、その前の画像があればそれを返す。
    /// 返した画像は履歴に積み直さない（履歴が2枚未満なら何もしない）
    pub fn previous(&mut self) -> Option<PathBuf> {
        self.history.pop()?;
        self.history.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn folder_with_files(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in names {
            fs::write(dir.path().join(name), b"dummy").expect("write");
        }
        dir
    }

    #[test]
    fn load_collects_exactly_the_folder_entries() {
        let dir = folder_with_files(&["a.jpg", "b.png", "c.txt"]);
        fs::create_dir(dir.path().join("sub")).expect("subdir");

        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        let expected: HashSet<PathBuf> = ["a.jpg", "b.png", "c.txt"]
            .iter()
            .map(|n| dir.path().join(n))
            .collect();
        let got: HashSet<PathBuf> = playlist.entries.iter().cloned().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn advance_cycles_back_after_a_full_pass() {
        let dir = folder_with_files(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        let first = playlist.advance().expect("first");
        for _ in 0..playlist.len() - 1 {
            playlist.advance().expect("advance");
        }
        assert_eq!(playlist.advance().expect("wrapped"), first);
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        assert!(playlist.is_empty());
        assert_eq!(playlist.advance(), None);
        assert_eq!(playlist.previous(), None);
    }

    #[test]
    fn previous_returns_the_prior_entry() {
        let dir = folder_with_files(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        playlist.advance().expect("first");
        let second = playlist.advance().expect("second");
        playlist.advance().expect("third");

        assert_eq!(playlist.previous(), Some(second));
        // 戻った分は履歴から消費されるので、残りは最初の1枚のみ
        assert_eq!(playlist.previous(), None);
    }

    #[test]
    fn position_tracks_the_displayed_entry() {
        let dir = folder_with_files(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        playlist.advance().expect("first");
        let second = playlist.advance().expect("second");
        assert_eq!(playlist.position(&second), Some(1));

        // 戻ったあとも位置は表示中の画像を指す
        let first = playlist.previous().expect("back");
        assert_eq!(playlist.position(&first), Some(0));
    }

    #[test]
    fn previous_with_single_entry_is_a_noop() {
        let dir = folder_with_files(&["a.jpg", "b.jpg"]);
        let mut playlist = Playlist::default();
        playlist.load(dir.path());

        playlist.advance().expect("first");
        assert_eq!(playlist.previous(), None);
    }
}
