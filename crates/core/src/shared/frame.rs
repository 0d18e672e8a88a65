/// Pixel dimensions of the video frame a detection set refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A frame with a zero dimension cannot be used to normalize coordinates
    /// (e.g. the video element has not reported its size yet).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A single captured video frame: contiguous RGB bytes in row-major order.
///
/// The engine never inspects pixels; frames only travel from the frame
/// source to the detectors.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}
