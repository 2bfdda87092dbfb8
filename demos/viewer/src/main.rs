use iced::widget::{
    button, checkbox, column, container, image as iced_image, row, scrollable, text,
};
use iced::{Element, Length, Task, Theme};
use image::DynamicImage;
use image_shape_utils::{
    load,
    ops::{self, Operation, OperationOutput},
    overlay, snake,
};
use log::info;

pub fn main() -> iced::Result {
    env_logger::init();
    iced::application(Viewer::new, Viewer::update, Viewer::view)
        .title(|_state: &Viewer| "Image Processing Demo".to_string())
        .theme(|_state: &Viewer| Theme::Dark)
        .run()
}

struct Viewer {
    // The uploaded image; operations always recompute from this original.
    image: Option<DynamicImage>,
    original_handle: Option<iced_image::Handle>,

    selected: Vec<Operation>,
    sections: Vec<Section>,
    status: String,
}

/// One rendered result, titled by its operation.
struct Section {
    op: Operation,
    handle: iced_image::Handle,
}

#[derive(Debug, Clone)]
enum Message {
    PickImage,
    ImageLoaded(Result<Upload, String>),
    OperationToggled(Operation, bool),
}

#[derive(Debug, Clone)]
struct Upload {
    name: String,
    image: DynamicImage,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            image: None,
            original_handle: None,
            selected: Vec::new(),
            sections: Vec::new(),
            status: "Upload an image to start.".to_string(),
        }
    }
}

impl Viewer {
    fn new() -> (Self, Task<Message>) {
        (Self::default(), Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                self.status = "Choose an image...".to_string();
                Task::perform(pick_image(), Message::ImageLoaded)
            }
            Message::ImageLoaded(Ok(upload)) => {
                info!(
                    "uploaded {} ({}x{})",
                    upload.name,
                    upload.image.width(),
                    upload.image.height()
                );
                self.original_handle = Some(to_handle(&upload.image));
                self.image = Some(upload.image);
                self.status = format!("Uploaded {}.", upload.name);
                self.recompute();
                Task::none()
            }
            Message::ImageLoaded(Err(err)) => {
                // Prior image and results stay on screen.
                self.status = format!("Upload failed: {err}");
                Task::none()
            }
            Message::OperationToggled(op, checked) => {
                if checked {
                    if !self.selected.contains(&op) {
                        self.selected.push(op);
                    }
                } else {
                    self.selected.retain(|&o| o != op);
                }
                self.recompute();
                Task::none()
            }
        }
    }

    /// Re-runs the dispatcher over the current selection. Each section is
    /// computed from the original upload, never from another section.
    fn recompute(&mut self) {
        let Some(image) = &self.image else {
            self.sections.clear();
            return;
        };
        self.sections = ops::run_selected(&self.selected, image)
            .into_iter()
            .map(|(op, output)| {
                let rendered = match output {
                    OperationOutput::Mask(mask) => overlay::mask_to_display(&mask),
                    OperationOutput::Contour(points) => DynamicImage::ImageRgb8(
                        overlay::snake_overlay(image, &snake::initial_contour(), &points),
                    ),
                };
                Section {
                    op,
                    handle: to_handle(&rendered),
                }
            })
            .collect();
    }

    fn view(&self) -> Element<'_, Message> {
        let mut content = column![
            text("Image Processing Demo").size(24),
            row![
                button("Upload image...").on_press(Message::PickImage),
                text(&self.status).size(14),
            ]
            .spacing(20)
            .align_y(iced::Alignment::Center),
        ]
        .spacing(20)
        .padding(20);

        // No image, no operation checklist.
        if let Some(handle) = &self.original_handle {
            let mut checks = row![].spacing(20);
            for op in Operation::ALL {
                checks = checks.push(
                    checkbox(op.label(), self.selected.contains(&op))
                        .on_toggle(move |checked| Message::OperationToggled(op, checked)),
                );
            }
            content = content.push(checks);
            content = content.push(section("Uploaded Image", handle));
            for s in &self.sections {
                content = content.push(section(s.op.label(), &s.handle));
            }
        }

        scrollable(container(content).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }
}

fn section<'a>(title: &'a str, handle: &iced_image::Handle) -> Element<'a, Message> {
    column![
        text(title).size(16),
        iced_image::viewer(handle.clone()).width(Length::Fill),
    ]
    .spacing(10)
    .into()
}

fn to_handle(image: &DynamicImage) -> iced_image::Handle {
    let rgba = image.to_rgba8();
    iced_image::Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

async fn pick_image() -> Result<Upload, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .add_filter("Images", &load::SUPPORTED_EXTENSIONS)
        .pick_file()
        .await
    else {
        return Err("no file selected".to_string());
    };
    let bytes = handle.read().await;
    let name = handle.file_name();
    let image = load::from_bytes(&name, &bytes).map_err(|err| err.to_string())?;
    Ok(Upload { name, image })
}
