use log::debug;
use std::collections::HashMap;

/// 可销毁的灯箱组件实例
pub trait LightboxWidget {
    /// 解除事件绑定并释放实例
    fn destroy(&mut self);
}

/// 容器标识 → 当前实例
///
/// 每个容器同一时刻最多只有一个实例，重新初始化前先销毁旧实例。
pub struct LightboxRegistry<W: LightboxWidget> {
    instances: HashMap<String, W>,
}

impl<W: LightboxWidget> Default for LightboxRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: LightboxWidget> LightboxRegistry<W> {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }

    /// 在容器上初始化灯箱
    ///
    /// 已有实例会先被销毁，再调用 `factory` 创建新实例。创建失败时容器上不保留任何实例。
    pub fn attach<F, E>(&mut self, container: &str, factory: F) -> Result<&mut W, E>
    where
        F: FnOnce(&str) -> Result<W, E>,
    {
        self.detach(container);

        let widget = factory(container)?;
        debug!("灯箱已挂载到容器: {}", container);
        Ok(self.instances.entry(container.to_string()).or_insert(widget))
    }

    /// 销毁并移除容器上的实例，返回是否存在实例
    pub fn detach(&mut self, container: &str) -> bool {
        match self.instances.remove(container) {
            Some(mut widget) => {
                widget.destroy();
                debug!("灯箱已从容器卸载: {}", container);
                true
            }
            None => false,
        }
    }

    /// 销毁全部实例
    pub fn clear(&mut self) {
        for (_, mut widget) in self.instances.drain() {
            widget.destroy();
        }
    }

    pub fn is_attached(&self, container: &str) -> bool {
        self.instances.contains_key(container)
    }

    pub fn get(&self, container: &str) -> Option<&W> {
        self.instances.get(container)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<W: LightboxWidget> Drop for LightboxRegistry<W> {
    fn drop(&mut self) {
        self.clear();
    }
}
