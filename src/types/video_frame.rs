#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>, // Tightly packed RGBA
    pub width: u32,
    pub height: u32,
    pub timestamp: f64, // Presentation time in seconds
    pub frame_number: u64,
}

impl VideoFrame {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 16.0 / 9.0;
        }
        self.width as f32 / self.height as f32
    }
}
