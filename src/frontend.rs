// Embedded control page served at `/`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>picar</title>
<style>
  body { font-family: sans-serif; text-align: center; background: #111; color: #eee; }
  img { max-width: 100%; border: 1px solid #444; }
  .pad { display: grid; grid-template-columns: repeat(3, 5.5em); gap: 0.5em;
         justify-content: center; margin: 1em; }
  button { font-size: 1.1em; padding: 0.8em 0; background: #333; color: #eee;
           border: 1px solid #555; border-radius: 4px; }
  button:active { background: #5a5; }
  #stop { background: #a33; }
</style>
</head>
<body>
<h3>picar</h3>
<img src="/video_feed" alt="video feed">
<div class="pad">
  <button data-cmd="left">&#8598;</button>
  <button data-cmd="forward">&#8593;</button>
  <button data-cmd="right">&#8599;</button>
  <button data-cmd="rev_left">&#8601;</button>
  <button id="stop" data-cmd="stop">&#9632;</button>
  <button data-cmd="rev_right">&#8600;</button>
  <button data-cmd="reverse" style="grid-column: 2">&#8595;</button>
</div>
<script>
  const send = (cmd) => fetch('/' + cmd).catch(() => {});
  for (const btn of document.querySelectorAll('button')) {
    const cmd = btn.dataset.cmd;
    btn.addEventListener('pointerdown', () => send(cmd));
    if (cmd !== 'stop') {
      btn.addEventListener('pointerup', () => send('stop'));
      btn.addEventListener('pointerleave', () => send('stop'));
    }
  }
</script>
</body>
</html>
"#;
