// BoundedChannel - 容量固定・明示クローズ可能なMPMCキュー
// 全てのステージはこのキューで接続される

use crate::core::{PipelineError, PipelineResult};
use std::sync::Arc;

/// 容量固定のマルチプロデューサ・マルチコンシューマキュー
///
/// 各アイテムはちょうど1つの受信者に届く（競合コンシューマ）。
/// `recv`はキューがクローズされ、かつ空になった時点で`None`を返す。
/// クローンは同じキューを指すハンドルで、ドロップしてもキューはクローズされない。
/// クローズは指定されたクローザーが`close`で明示的に行う。
pub struct BoundedChannel<T> {
    name: Arc<str>,
    capacity: usize,
    tx: async_channel::Sender<T>,
    rx: async_channel::Receiver<T>,
}

impl<T> Clone for BoundedChannel<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            capacity: self.capacity,
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedChannel")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> BoundedChannel<T> {
    /// 新しいキューを作成
    pub fn new(name: impl Into<String>, capacity: usize) -> PipelineResult<Self> {
        let name: String = name.into();
        if capacity == 0 {
            return Err(PipelineError::configuration(format!(
                "キュー容量は1以上である必要があります ({name})"
            )));
        }

        let (tx, rx) = async_channel::bounded(capacity);
        Ok(Self {
            name: Arc::from(name),
            capacity,
            tx,
            rx,
        })
    }

    /// アイテムを送信（満杯なら空きが出るまで待機）
    pub async fn send(&self, item: T) -> PipelineResult<()> {
        self.tx
            .send(item)
            .await
            .map_err(|_| PipelineError::closed_channel(self.name.as_ref()))
    }

    /// アイテムを受信（クローズ済みかつ空なら`None`）
    pub async fn recv(&self) -> Option<T> {
        self.rx.recv().await.ok()
    }

    /// キューをクローズ
    ///
    /// 実際にクローズを行った呼び出しのみ`true`を返す。
    /// 既にキューにあるアイテムは引き続き受信できる。
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
